use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

use crate::{
    attributes::{Attributes, CodeAttribute, ExceptionTableEntry},
    class_file::{FieldInfo, MethodInfo},
    constant_pool::CpInfo,
    Attribute, ClassFile, ClassFileError, ConstantPool, Result,
};

type Endian = BigEndian;

/// Serializer for the class file format. Every count and length field is
/// derived from the sequence it describes at write time; nothing is cached
/// from parse time, so removing records from an attribute table cannot leave
/// a stale enclosing length behind.
pub struct Writer<W> {
    w: W,
}
impl<W: Write> Writer<W> {
    pub fn new(w: W) -> Self {
        Self { w }
    }

    pub fn write(&mut self, class_file: &ClassFile) -> Result<()> {
        self.write_u32(0xCAFEBABE)?;
        self.write_u16(class_file.version.minor)?;
        self.write_u16(class_file.version.major)?;

        self.write_constant_pool(&class_file.constant_pool)?;
        self.write_u16(class_file.access_flags.bits())?;
        self.write_u16(class_file.this_class)?;
        self.write_u16(class_file.super_class)?;

        self.write_u16(len16("interfaces_count", class_file.interfaces.len())?)?;
        for interface in &class_file.interfaces {
            self.write_u16(*interface)?;
        }

        self.write_u16(len16("fields_count", class_file.fields.len())?)?;
        for field in &class_file.fields {
            self.write_field_info(field)?;
        }

        self.write_u16(len16("methods_count", class_file.methods.len())?)?;
        for method in &class_file.methods {
            self.write_method_info(method)?;
        }

        self.write_attributes(&class_file.attributes)
    }

    fn write_constant_pool(&mut self, constant_pool: &ConstantPool) -> Result<()> {
        // The count field is one more than the number of occupied slots;
        // 8-byte constants already occupy two slots via their placeholder.
        self.write_u16(len16("constant_pool_count", constant_pool.len() + 1)?)?;
        for cp_info in constant_pool {
            self.write_cp_info(cp_info)?;
        }
        Ok(())
    }

    fn write_cp_info(&mut self, cp_info: &CpInfo) -> Result<()> {
        match cp_info {
            CpInfo::Utf8(utf8) => {
                self.write_u8(1)?;
                self.write_u16(len16("Utf8 length", utf8.bytes.len())?)?;
                self.w.write_all(&utf8.bytes)?;
            }
            CpInfo::Integer(value) => {
                self.write_u8(3)?;
                self.w.write_i32::<Endian>(*value)?;
            }
            CpInfo::Float { bits } => {
                self.write_u8(4)?;
                self.write_u32(*bits)?;
            }
            CpInfo::Long(value) => {
                self.write_u8(5)?;
                self.write_u64(*value as u64)?;
            }
            CpInfo::Double { bits } => {
                self.write_u8(6)?;
                self.write_u64(*bits)?;
            }
            CpInfo::Class(class_info) => {
                self.write_u8(7)?;
                self.write_u16(class_info.name_index)?;
            }
            CpInfo::String { string_index } => {
                self.write_u8(8)?;
                self.write_u16(*string_index)?;
            }
            CpInfo::FieldRef(ref_info) => {
                self.write_u8(9)?;
                self.write_u16(ref_info.class_index)?;
                self.write_u16(ref_info.name_and_type_index)?;
            }
            CpInfo::MethodRef(ref_info) => {
                self.write_u8(10)?;
                self.write_u16(ref_info.class_index)?;
                self.write_u16(ref_info.name_and_type_index)?;
            }
            CpInfo::InterfaceMethodRef(ref_info) => {
                self.write_u8(11)?;
                self.write_u16(ref_info.class_index)?;
                self.write_u16(ref_info.name_and_type_index)?;
            }
            CpInfo::NameAndType(name_and_type) => {
                self.write_u8(12)?;
                self.write_u16(name_and_type.name_index)?;
                self.write_u16(name_and_type.descriptor_index)?;
            }
            CpInfo::MethodHandle(method_handle) => {
                self.write_u8(15)?;
                self.write_u8(method_handle.reference_kind)?;
                self.write_u16(method_handle.reference_index)?;
            }
            CpInfo::MethodType(method_type) => {
                self.write_u8(16)?;
                self.write_u16(method_type.descriptor_index)?;
            }
            CpInfo::Dynamic(dynamic) => {
                self.write_u8(17)?;
                self.write_u16(dynamic.bootstrap_method_attr_index)?;
                self.write_u16(dynamic.name_and_type_index)?;
            }
            CpInfo::InvokeDynamic(dynamic) => {
                self.write_u8(18)?;
                self.write_u16(dynamic.bootstrap_method_attr_index)?;
                self.write_u16(dynamic.name_and_type_index)?;
            }
            CpInfo::Module { name_index } => {
                self.write_u8(19)?;
                self.write_u16(*name_index)?;
            }
            CpInfo::Package { name_index } => {
                self.write_u8(20)?;
                self.write_u16(*name_index)?;
            }
            // The placeholder slot after a Long or Double has no encoding.
            CpInfo::Unusable => {}
        }
        Ok(())
    }

    fn write_field_info(&mut self, field: &FieldInfo) -> Result<()> {
        self.write_u16(field.access_flags.bits())?;
        self.write_u16(field.name_index)?;
        self.write_u16(field.descriptor_index)?;
        self.write_attributes(&field.attributes)
    }

    fn write_method_info(&mut self, method: &MethodInfo) -> Result<()> {
        self.write_u16(method.access_flags.bits())?;
        self.write_u16(method.name_index)?;
        self.write_u16(method.descriptor_index)?;
        self.write_attributes(&method.attributes)
    }

    fn write_attributes(&mut self, attributes: &Attributes) -> Result<()> {
        self.write_u16(len16("attributes_count", attributes.0.len())?)?;
        for attribute in &attributes.0 {
            self.write_attribute(attribute)?;
        }
        Ok(())
    }

    fn write_attribute(&mut self, attribute: &Attribute) -> Result<()> {
        self.write_u16(attribute.attribute_name_index)?;
        self.write_u32(len32("attribute_length", attribute.info.len())?)?;
        self.w.write_all(&attribute.info)?;
        Ok(())
    }

    pub fn write_code_attribute(&mut self, code_attribute: &CodeAttribute) -> Result<()> {
        self.write_u16(code_attribute.max_stack)?;
        self.write_u16(code_attribute.max_locals)?;
        self.write_u32(len32("code_length", code_attribute.code.len())?)?;
        self.w.write_all(&code_attribute.code)?;
        self.write_u16(len16(
            "exception_table_length",
            code_attribute.exception_table.len(),
        )?)?;
        for entry in &code_attribute.exception_table {
            self.write_exception_table_entry(entry)?;
        }
        self.write_attributes(&code_attribute.attributes)
    }

    fn write_exception_table_entry(&mut self, entry: &ExceptionTableEntry) -> Result<()> {
        self.write_u16(entry.start_pc)?;
        self.write_u16(entry.end_pc)?;
        self.write_u16(entry.handler_pc)?;
        self.write_u16(entry.catch_type)?;
        Ok(())
    }

    fn write_u64(&mut self, value: u64) -> Result<()> {
        Ok(self.w.write_u64::<Endian>(value)?)
    }

    fn write_u32(&mut self, value: u32) -> Result<()> {
        Ok(self.w.write_u32::<Endian>(value)?)
    }

    fn write_u16(&mut self, value: u16) -> Result<()> {
        Ok(self.w.write_u16::<Endian>(value)?)
    }

    fn write_u8(&mut self, value: u8) -> Result<()> {
        Ok(self.w.write_u8(value)?)
    }
}

fn len16(field: &'static str, len: usize) -> Result<u16> {
    u16::try_from(len).map_err(|_| ClassFileError::SerializationOverflow(field, len))
}

fn len32(field: &'static str, len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| ClassFileError::SerializationOverflow(field, len))
}
