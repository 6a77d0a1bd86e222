use thiserror::Error;

use crate::constant_pool;

#[derive(Error, Debug)]
pub enum ClassFileError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error("Invalid magic identifier: 0x{0:X}")]
    InvalidMagicIdentifier(u32),
    #[error("Invalid cp info tag: {0}")]
    InvalidCpInfoTag(u8),
    #[error("Expected {0}, found {1:?}")]
    UnexpectedConstantPoolEntry(&'static str, constant_pool::CpInfo),
    #[error("Invalid constant pool index: {0}")]
    InvalidConstantPoolIndex(u16),
    #[error("Invalid constant pool count: {0}")]
    InvalidConstantPoolCount(u16),
    #[error("8-byte constant overruns the declared constant pool count")]
    ConstantPoolOverrun,
    #[error("Declared length {0} exceeds the {1} remaining bytes")]
    LengthOutOfBounds(u32, u64),
    #[error("{0} unconsumed bytes after the last parsed item")]
    TrailingBytes(u64),
    #[error("Constant pool Utf8 entry is not valid UTF-8")]
    InvalidUtf8,
    #[error("Value {1} does not fit the {0} field")]
    SerializationOverflow(&'static str, usize),
}
