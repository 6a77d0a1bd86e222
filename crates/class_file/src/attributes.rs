use crate::{constant_pool::CpInfo, writer::Writer, Attribute, ConstantPool, Result};

use super::parser::Parser;

/// A table of named, length-prefixed attribute records. Used at the class,
/// field and method level, and nested inside a method's `Code` attribute.
#[derive(Debug)]
pub struct Attributes(pub Vec<Attribute>);
impl Attributes {
    pub fn find_by_name(&self, name: &str, constant_pool: &ConstantPool) -> Option<&Attribute> {
        self.position_of(name, constant_pool).map(|i| &self.0[i])
    }

    pub fn position_of(&self, name: &str, constant_pool: &ConstantPool) -> Option<usize> {
        self.0.iter().position(|a| {
            matches!(
                constant_pool.get(a.attribute_name_index),
                Some(CpInfo::Utf8(s)) if s.matches(name)
            )
        })
    }

    pub fn code_attribute(&self, constant_pool: &ConstantPool) -> Result<Option<CodeAttribute>> {
        let Some(attribute) = self.find_by_name("Code", constant_pool) else {
            return Ok(None);
        };

        Ok(Some(CodeAttribute::parse(&attribute.info, constant_pool)?))
    }
}

#[derive(Debug, PartialEq)]
pub struct ExceptionTableEntry {
    pub start_pc: u16,
    pub end_pc: u16,
    pub handler_pc: u16,
    pub catch_type: u16,
}

#[derive(Debug)]
pub struct CodeAttribute {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,
    pub exception_table: Vec<ExceptionTableEntry>,
    pub attributes: Attributes,
}
impl CodeAttribute {
    /// Parses the content of a `Code` attribute. The slice must hold exactly
    /// the attribute's declared `info` bytes.
    pub fn parse(bytes: &[u8], constant_pool: &ConstantPool) -> Result<CodeAttribute> {
        let mut parser = Parser::new(bytes);
        let code_attribute = parser.parse_code_attribute(constant_pool)?;
        parser.expect_end()?;

        Ok(code_attribute)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        Writer::new(&mut buf).write_code_attribute(self)?;
        Ok(buf)
    }
}
