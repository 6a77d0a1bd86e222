use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt};

use crate::{
    attributes::{Attributes, CodeAttribute, ExceptionTableEntry},
    class_file::{FieldInfo, MethodInfo, Version},
    constant_pool::{CpInfo, Utf8Info},
};

use super::*;

type Result<T, E = ClassFileError> = std::result::Result<T, E>;
type Endian = BigEndian;

pub struct Parser<'a> {
    r: Cursor<&'a [u8]>,
}
impl<'a> Parser<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { r: Cursor::new(buf) }
    }

    pub fn parse(&mut self) -> Result<ClassFile> {
        self.parse_magic_identifier()?;
        let version = self.parse_version()?;

        let constant_pool = self.parse_constant_pool()?;
        let access_flags = AccessFlags::from_bits_truncate(self.read_u16()?);
        let this_class = self.read_u16()?;
        let super_class = self.read_u16()?;
        let interfaces_count = self.read_u16()?;

        let mut interfaces = vec![0u16; interfaces_count as usize];
        self.r.read_u16_into::<Endian>(&mut interfaces)?;

        let fields_count = self.read_u16()?;
        let fields = (0..fields_count)
            .map(|_| self.parse_field_info(&constant_pool))
            .collect::<Result<Vec<_>>>()?;

        let methods_count = self.read_u16()?;
        let methods = (0..methods_count)
            .map(|_| self.parse_method_info(&constant_pool))
            .collect::<Result<Vec<_>>>()?;

        let attributes_count = self.read_u16()?;
        let attributes = self.parse_attributes(attributes_count, &constant_pool)?;

        self.expect_end()?;

        Ok(ClassFile {
            version,
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        })
    }

    fn parse_field_info(&mut self, constant_pool: &ConstantPool) -> Result<FieldInfo> {
        let access_flags = AccessFlags::from_bits_truncate(self.read_u16()?);
        let name_index = self.read_u16()?;
        let descriptor_index = self.read_u16()?;
        let attributes_count = self.read_u16()?;
        let attributes = self.parse_attributes(attributes_count, constant_pool)?;

        Ok(FieldInfo {
            access_flags,
            name_index,
            descriptor_index,
            attributes,
        })
    }

    fn parse_method_info(&mut self, constant_pool: &ConstantPool) -> Result<MethodInfo> {
        let access_flags = AccessFlags::from_bits_truncate(self.read_u16()?);
        let name_index = self.read_u16()?;
        let descriptor_index = self.read_u16()?;
        let attributes_count = self.read_u16()?;
        let attributes = self.parse_attributes(attributes_count, constant_pool)?;

        Ok(MethodInfo {
            access_flags,
            name_index,
            descriptor_index,
            attributes,
        })
    }

    fn parse_magic_identifier(&mut self) -> Result<()> {
        match self.read_u32()? {
            0xCAFEBABE => Ok(()),
            magic_identifier => Err(ClassFileError::InvalidMagicIdentifier(magic_identifier)),
        }
    }

    fn parse_version(&mut self) -> Result<Version> {
        let minor = self.read_u16()?;
        let major = self.read_u16()?;
        Ok(Version { minor, major })
    }

    fn parse_constant_pool(&mut self) -> Result<ConstantPool> {
        let constant_pool_count = self.read_u16()?;
        if constant_pool_count == 0 {
            return Err(ClassFileError::InvalidConstantPoolCount(constant_pool_count));
        }

        let mut count = constant_pool_count as usize - 1;
        let mut res = Vec::with_capacity(count);
        while count > 0 {
            let (cp_info, slot_size) = self.parse_cp_info()?;
            if slot_size > count {
                return Err(ClassFileError::ConstantPoolOverrun);
            }

            res.push(cp_info);
            (0..slot_size - 1).for_each(|_| res.push(CpInfo::Unusable));

            count -= slot_size;
        }
        Ok(ConstantPool::new(res))
    }

    fn parse_cp_info(&mut self) -> Result<(CpInfo, usize)> {
        let tag = self.read_u8()?;
        let (cp_info, slot_size) = match tag {
            1 => (self.parse_utf8()?, 1),
            3 => (CpInfo::Integer(self.read_i32()?), 1),
            4 => (CpInfo::Float { bits: self.read_u32()? }, 1),
            5 => (CpInfo::Long(self.read_u64()? as i64), 2),
            6 => (CpInfo::Double { bits: self.read_u64()? }, 2),
            7 => (self.parse_class_info()?, 1),
            8 => (self.parse_string()?, 1),
            9 => (CpInfo::FieldRef(self.parse_ref_info()?), 1),
            10 => (CpInfo::MethodRef(self.parse_ref_info()?), 1),
            11 => (CpInfo::InterfaceMethodRef(self.parse_ref_info()?), 1),
            12 => (self.parse_name_and_type_info()?, 1),
            15 => (self.parse_method_handle()?, 1),
            16 => (self.parse_method_type_info()?, 1),
            17 => (CpInfo::Dynamic(self.parse_dynamic_info()?), 1),
            18 => (CpInfo::InvokeDynamic(self.parse_dynamic_info()?), 1),
            19 => (CpInfo::Module { name_index: self.read_u16()? }, 1),
            20 => (CpInfo::Package { name_index: self.read_u16()? }, 1),
            _ => return Err(ClassFileError::InvalidCpInfoTag(tag)),
        };

        Ok((cp_info, slot_size))
    }

    fn parse_utf8(&mut self) -> Result<CpInfo> {
        let length = self.read_u16()?;
        self.check_length(length as u32)?;
        let mut bytes = vec![0u8; length as usize];
        self.r.read_exact(&mut bytes)?;

        Ok(CpInfo::Utf8(Utf8Info::new(bytes)))
    }

    fn parse_class_info(&mut self) -> Result<CpInfo> {
        let name_index = self.read_u16()?;

        Ok(CpInfo::Class(constant_pool::ClassInfo { name_index }))
    }

    fn parse_string(&mut self) -> Result<CpInfo> {
        let string_index = self.read_u16()?;

        Ok(CpInfo::String { string_index })
    }

    fn parse_name_and_type_info(&mut self) -> Result<CpInfo> {
        let name_index = self.read_u16()?;
        let descriptor_index = self.read_u16()?;

        Ok(CpInfo::NameAndType(constant_pool::NameAndTypeInfo {
            name_index,
            descriptor_index,
        }))
    }

    fn parse_method_handle(&mut self) -> Result<CpInfo> {
        let reference_kind = self.read_u8()?;
        let reference_index = self.read_u16()?;

        Ok(CpInfo::MethodHandle(constant_pool::MethodHandleInfo {
            reference_kind,
            reference_index,
        }))
    }

    fn parse_method_type_info(&mut self) -> Result<CpInfo> {
        let descriptor_index = self.read_u16()?;

        Ok(CpInfo::MethodType(constant_pool::MethodTypeInfo {
            descriptor_index,
        }))
    }

    fn parse_dynamic_info(&mut self) -> Result<constant_pool::DynamicInfo> {
        let bootstrap_method_attr_index = self.read_u16()?;
        let name_and_type_index = self.read_u16()?;

        Ok(constant_pool::DynamicInfo {
            bootstrap_method_attr_index,
            name_and_type_index,
        })
    }

    fn parse_ref_info(&mut self) -> Result<constant_pool::RefInfo> {
        let class_index = self.read_u16()?;
        let name_and_type_index = self.read_u16()?;

        Ok(constant_pool::RefInfo {
            class_index,
            name_and_type_index,
        })
    }

    fn parse_attribute(&mut self, constant_pool: &ConstantPool) -> Result<Attribute> {
        let attribute_name_index = self.read_u16()?;
        match constant_pool.get(attribute_name_index) {
            Some(CpInfo::Utf8(_)) => {}
            Some(c) => {
                return Err(ClassFileError::UnexpectedConstantPoolEntry(
                    "Utf8",
                    c.clone(),
                ))
            }
            None => return Err(ClassFileError::InvalidConstantPoolIndex(attribute_name_index)),
        }

        let attribute_length = self.read_u32()?;
        self.check_length(attribute_length)?;
        let mut info = vec![0u8; attribute_length as usize];
        self.r.read_exact(&mut info)?;

        Ok(Attribute {
            attribute_name_index,
            info,
        })
    }

    pub fn parse_code_attribute(&mut self, constant_pool: &ConstantPool) -> Result<CodeAttribute> {
        let max_stack = self.read_u16()?;
        let max_locals = self.read_u16()?;
        let code_length = self.read_u32()?;
        self.check_length(code_length)?;
        let mut code = vec![0u8; code_length as usize];
        self.r.read_exact(&mut code)?;
        let exception_table_length = self.read_u16()?;
        let exception_table = (0..exception_table_length)
            .map(|_| self.parse_exception_table_entry())
            .collect::<Result<Vec<_>>>()?;
        let attributes_count = self.read_u16()?;
        let attributes = self.parse_attributes(attributes_count, constant_pool)?;

        Ok(CodeAttribute {
            max_stack,
            max_locals,
            code,
            exception_table,
            attributes,
        })
    }

    fn parse_exception_table_entry(&mut self) -> Result<ExceptionTableEntry> {
        let start_pc = self.read_u16()?;
        let end_pc = self.read_u16()?;
        let handler_pc = self.read_u16()?;
        let catch_type = self.read_u16()?;

        Ok(ExceptionTableEntry {
            start_pc,
            end_pc,
            handler_pc,
            catch_type,
        })
    }

    fn parse_attributes(
        &mut self,
        attributes_count: u16,
        constant_pool: &ConstantPool,
    ) -> Result<Attributes> {
        (0..attributes_count)
            .map(|_| self.parse_attribute(constant_pool))
            .collect::<Result<Vec<_>>>()
            .map(Attributes)
    }

    pub(crate) fn expect_end(&self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(ClassFileError::TrailingBytes(n)),
        }
    }

    fn remaining(&self) -> u64 {
        self.r.get_ref().len() as u64 - self.r.position()
    }

    fn check_length(&self, length: u32) -> Result<()> {
        if length as u64 > self.remaining() {
            return Err(ClassFileError::LengthOutOfBounds(length, self.remaining()));
        }
        Ok(())
    }

    fn read_u64(&mut self) -> Result<u64> {
        Ok(self.r.read_u64::<Endian>()?)
    }

    fn read_u32(&mut self) -> Result<u32> {
        Ok(self.r.read_u32::<Endian>()?)
    }

    fn read_u16(&mut self) -> Result<u16> {
        Ok(self.r.read_u16::<Endian>()?)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.r.read_u8()?)
    }

    fn read_i32(&mut self) -> Result<i32> {
        Ok(self.r.read_i32::<Endian>()?)
    }
}


#[cfg(test)]
mod parse_constant_pool_tests {
    use super::*;

    #[test]
    fn it_should_fail_on_a_zero_count() {
        assert!(matches!(
            Parser::new(&[0x00, 0x00]).parse_constant_pool(),
            Err(ClassFileError::InvalidConstantPoolCount(0))
        ));
    }

    #[test]
    fn it_should_reserve_two_slots_for_a_long() {
        // count 3: a Long occupies slots 1 and 2
        let constant_pool = Parser::new(&[0x00, 0x03, 5, 0, 0, 0, 0, 0, 0, 0, 42])
            .parse_constant_pool()
            .unwrap();

        assert_eq!(Some(&CpInfo::Long(42)), constant_pool.get(1));
        assert_eq!(Some(&CpInfo::Unusable), constant_pool.get(2));
        assert_eq!(None, constant_pool.get(3));
    }

    #[test]
    fn it_should_fail_if_a_long_overruns_the_declared_count() {
        // count 2 leaves a single slot, too few for an 8-byte constant
        assert!(matches!(
            Parser::new(&[0x00, 0x02, 5, 0, 0, 0, 0, 0, 0, 0, 42]).parse_constant_pool(),
            Err(ClassFileError::ConstantPoolOverrun)
        ));
    }

    #[test]
    fn it_should_fail_on_an_unknown_tag() {
        assert!(matches!(
            Parser::new(&[0x00, 0x02, 13, 0, 0]).parse_constant_pool(),
            Err(ClassFileError::InvalidCpInfoTag(13))
        ));
    }
}

#[cfg(test)]
mod parse_attribute_tests {
    use super::*;

    fn utf8_pool() -> ConstantPool {
        ConstantPool::new(vec![CpInfo::Utf8(Utf8Info::from("Deprecated"))])
    }

    #[test]
    fn it_should_parse_an_empty_attribute() {
        let attribute = Parser::new(&[0x00, 0x01, 0x00, 0x00, 0x00, 0x00])
            .parse_attribute(&utf8_pool())
            .unwrap();

        assert_eq!(1, attribute.attribute_name_index);
        assert!(attribute.info.is_empty());
    }

    #[test]
    fn it_should_fail_if_the_declared_length_exceeds_the_input() {
        assert!(matches!(
            Parser::new(&[0x00, 0x01, 0x00, 0x00, 0x00, 0x09, 0xff]).parse_attribute(&utf8_pool()),
            Err(ClassFileError::LengthOutOfBounds(9, 1))
        ));
    }

    #[test]
    fn it_should_fail_if_the_name_index_is_out_of_range() {
        assert!(matches!(
            Parser::new(&[0x00, 0x07, 0x00, 0x00, 0x00, 0x00]).parse_attribute(&utf8_pool()),
            Err(ClassFileError::InvalidConstantPoolIndex(7))
        ));
    }
}
