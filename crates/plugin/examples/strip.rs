use std::{env, fs};

use jstrip_plugin::{ByteOrder, InternTable, Resource, ResourcePool, StripDebugPlugin};

fn main() {
    pretty_env_logger::init();

    let path = env::args().nth(1).expect("usage: strip <class-file>");
    let content = fs::read(&path).unwrap();
    let original_len = content.len();

    let resource_path = format!("/{}", path.trim_start_matches('/'));
    let mut input = ResourcePool::new(ByteOrder::native());
    input.add(Resource::new(resource_path.clone(), content)).unwrap();

    let mut output = ResourcePool::new(input.byte_order());
    let mut strings = InternTable::new();
    StripDebugPlugin::new()
        .visit(&input, &mut output, &mut strings)
        .unwrap();

    let stripped = output.get(&resource_path).unwrap();
    let out_path = format!("{}.stripped", path);
    fs::write(&out_path, stripped.bytes()).unwrap();

    println!(
        "{}: {} -> {} bytes ({})",
        path,
        original_len,
        stripped.len(),
        out_path
    );
}
