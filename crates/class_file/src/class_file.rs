use crate::{
    attributes::Attributes, constant_pool::ClassInfo, matches_cp_info, parser::Parser,
    writer::Writer, AccessFlags, ConstantPool, Result,
};

#[derive(Debug)]
pub struct ClassFile {
    pub version: Version,
    pub constant_pool: ConstantPool,
    pub access_flags: AccessFlags,
    pub this_class: u16,
    pub super_class: u16,
    pub interfaces: Vec<u16>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
    pub attributes: Attributes,
}
impl ClassFile {
    pub fn parse(bytes: &[u8]) -> Result<ClassFile> {
        Parser::new(bytes).parse()
    }

    /// Serializes back to the class file format. The structural inverse of
    /// [`ClassFile::parse`]: an untouched `ClassFile` reproduces its input
    /// byte for byte.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        Writer::new(&mut buf).write(self)?;
        Ok(buf)
    }

    pub fn super_class(&self) -> Result<Option<&str>> {
        // The value of the super_class item is either zero or a valid index
        // into the constant_pool table. Zero means this class file represents
        // java/lang/Object, the only class without a direct superclass.
        if self.super_class == 0 {
            return Ok(None);
        }

        let ClassInfo { name_index } =
            matches_cp_info!(self.constant_pool, self.super_class, Class)?;

        Ok(Some(
            matches_cp_info!(self.constant_pool, *name_index, Utf8)?.as_str()?,
        ))
    }

    pub fn class_name(&self) -> Result<&str> {
        // The value of the this_class item must be a valid index into the
        // constant_pool table. The constant_pool entry at that index must be a
        // CONSTANT_Class_info structure (ยง4.4.1) representing the class or
        // interface defined by this class file.

        let ClassInfo { name_index } =
            matches_cp_info!(self.constant_pool, self.this_class, Class)?;

        matches_cp_info!(self.constant_pool, *name_index, Utf8)?.as_str()
    }

    pub fn field_name(&self, field: &FieldInfo) -> Result<&str> {
        matches_cp_info!(self.constant_pool, field.name_index, Utf8)?.as_str()
    }

    pub fn field_descriptor(&self, field: &FieldInfo) -> Result<&str> {
        matches_cp_info!(self.constant_pool, field.descriptor_index, Utf8)?.as_str()
    }

    pub fn method_name(&self, method: &MethodInfo) -> Result<&str> {
        matches_cp_info!(self.constant_pool, method.name_index, Utf8)?.as_str()
    }

    pub fn method_descriptor(&self, method: &MethodInfo) -> Result<&str> {
        matches_cp_info!(self.constant_pool, method.descriptor_index, Utf8)?.as_str()
    }
}

/// Class file version, preserved verbatim across a transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub minor: u16,
    pub major: u16,
}

#[derive(Debug)]
pub struct FieldInfo {
    pub access_flags: AccessFlags,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Attributes,
}

#[derive(Debug)]
pub struct MethodInfo {
    pub access_flags: AccessFlags,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Attributes,
}
