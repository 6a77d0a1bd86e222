use jstrip_class_file::strip;

use crate::{Resource, ResourcePool, Result, StringTable};

/// Removes the `LineNumberTable`, `LocalVariableTable` and
/// `LocalVariableTypeTable` attributes from every class resource of a pool.
/// Module descriptors and non-class resources pass through unchanged.
#[derive(Debug, Default)]
pub struct StripDebugPlugin;

impl StripDebugPlugin {
    pub const NAME: &'static str = "strip-debug";

    pub fn new() -> Self {
        Self
    }

    /// Transforms every resource of `input` into `output` under the same
    /// path, in insertion order. The input pool is never mutated; a malformed
    /// class resource aborts the pass with no partial entry for that path.
    pub fn visit(
        &self,
        input: &ResourcePool,
        output: &mut ResourcePool,
        strings: &mut dyn StringTable,
    ) -> Result<()> {
        for resource in input.resources() {
            let transformed = if should_strip(resource.path()) {
                let (content, removed) = strip::strip_class(resource.bytes())?;
                log::debug!(
                    "{}: removed {} debug attributes",
                    resource.path(),
                    removed
                );
                Resource::new(resource.path(), content)
            } else {
                resource.clone()
            };

            strings.add_string(transformed.path());
            output.add(transformed)?;
        }
        Ok(())
    }
}

fn should_strip(path: &str) -> bool {
    path.ends_with(".class") && !path.ends_with("module-info.class")
}
