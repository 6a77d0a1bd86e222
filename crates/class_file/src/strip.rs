use crate::{
    attributes::{Attributes, CodeAttribute},
    constant_pool::CpInfo,
    Attribute, ClassFile, ConstantPool, Result,
};

/// Nested code attributes that only carry debugging metadata. Removing them
/// never affects execution semantics.
pub const DEBUG_ATTRIBUTE_NAMES: [&str; 3] = [
    "LineNumberTable",
    "LocalVariableTable",
    "LocalVariableTypeTable",
];

pub fn is_debug_attribute(name: &[u8]) -> bool {
    DEBUG_ATTRIBUTE_NAMES.iter().any(|n| n.as_bytes() == name)
}

/// Drops every debug attribute nested in a `Code` attribute, keeping all
/// other attributes in their original relative order. Bytecode, the
/// exception table and the stack/locals sizing are left untouched. Returns
/// the filtered attribute and the number of removed records.
pub fn strip_code_attribute(
    code_attribute: CodeAttribute,
    constant_pool: &ConstantPool,
) -> (CodeAttribute, usize) {
    let CodeAttribute {
        max_stack,
        max_locals,
        code,
        exception_table,
        attributes,
    } = code_attribute;

    let count = attributes.0.len();
    let retained = attributes
        .0
        .into_iter()
        .filter(|attribute| {
            !matches!(
                constant_pool.get(attribute.attribute_name_index),
                Some(CpInfo::Utf8(name)) if is_debug_attribute(&name.bytes)
            )
        })
        .collect::<Vec<Attribute>>();
    let removed = count - retained.len();

    (
        CodeAttribute {
            max_stack,
            max_locals,
            code,
            exception_table,
            attributes: Attributes(retained),
        },
        removed,
    )
}

/// Strips the debug attributes from every method of a class file and
/// re-serializes it. A second pass over the output removes nothing and is
/// byte-identical to its input.
pub fn strip_class(bytes: &[u8]) -> Result<(Vec<u8>, usize)> {
    let mut class_file = ClassFile::parse(bytes)?;

    let mut removed = 0;
    for method in class_file.methods.iter_mut() {
        let Some(position) = method
            .attributes
            .position_of("Code", &class_file.constant_pool)
        else {
            continue;
        };

        let attribute = &mut method.attributes.0[position];
        let code_attribute = CodeAttribute::parse(&attribute.info, &class_file.constant_pool)?;
        let (code_attribute, count) =
            strip_code_attribute(code_attribute, &class_file.constant_pool);
        if count == 0 {
            // Nothing removed; the original attribute bytes stay as parsed.
            continue;
        }

        attribute.info = code_attribute.to_bytes()?;
        removed += count;
    }

    Ok((class_file.to_bytes()?, removed))
}

#[cfg(test)]
mod is_debug_attribute_tests {
    use super::*;

    #[test]
    fn it_should_match_the_three_debug_attributes() {
        for name in DEBUG_ATTRIBUTE_NAMES {
            assert!(is_debug_attribute(name.as_bytes()));
        }
    }

    #[test]
    fn it_should_only_match_exact_names() {
        assert!(!is_debug_attribute(b"StackMapTable"));
        assert!(!is_debug_attribute(b"LineNumberTable2"));
        assert!(!is_debug_attribute(b"LineNumber"));
        assert!(!is_debug_attribute(b"linenumbertable"));
    }
}
