//! Wire codec traits shared by every transaction entity.
//!
//! Each entity implements `WireEncode`/`WireDecode` over the primitives
//! reader and writer. Encoding is total; decoding is partial and reports
//! truncation or oversized length prefixes as `MalformedEncoding` instead
//! of silently truncating. Ordered sequences are encoded as
//! `VarInt(count) || element*`.

use bch_primitives::wire::{VarInt, WireReader, WireWriter};

use crate::TransactionError;

/// Deterministic wire-format serialization for an entity.
pub trait WireEncode {
    /// Append this entity's wire encoding to the writer.
    ///
    /// # Arguments
    /// * `writer` - The writer to append serialized bytes to.
    fn write_to(&self, writer: &mut WireWriter);

    /// Serialize this entity to a standalone byte vector.
    ///
    /// # Returns
    /// A `Vec<u8>` containing the wire-format bytes.
    fn to_wire_bytes(&self) -> Vec<u8> {
        let mut writer = WireWriter::new();
        self.write_to(&mut writer);
        writer.into_bytes()
    }
}

/// Wire-format deserialization for an entity.
pub trait WireDecode: Sized {
    /// Decode one entity from the reader, advancing its position.
    ///
    /// # Arguments
    /// * `reader` - The reader positioned at the start of an encoded entity.
    ///
    /// # Returns
    /// `Ok(Self)` on success, or `MalformedEncoding` if the data is
    /// truncated or malformed.
    fn read_from(reader: &mut WireReader<'_>) -> Result<Self, TransactionError>;
}

/// Encode an ordered sequence as a VarInt count followed by each element.
///
/// # Arguments
/// * `writer` - The writer to append to.
/// * `items` - The elements to encode in order.
pub fn write_sequence<T: WireEncode>(writer: &mut WireWriter, items: &[T]) {
    writer.write_varint(VarInt::from(items.len()));
    for item in items {
        item.write_to(writer);
    }
}

/// Decode an ordered sequence encoded as a VarInt count followed by elements.
///
/// The pre-allocation is capped so a hostile count prefix cannot force a
/// huge allocation before the element reads hit end-of-input.
///
/// # Arguments
/// * `reader` - The reader positioned at the count prefix.
///
/// # Returns
/// The decoded elements in order, or `MalformedEncoding` on truncation.
pub fn read_sequence<T: WireDecode>(
    reader: &mut WireReader<'_>,
) -> Result<Vec<T>, TransactionError> {
    let count = reader
        .read_varint()
        .map_err(|e| TransactionError::MalformedEncoding(format!("reading element count: {}", e)))?
        .value();

    let mut items = Vec::with_capacity(count.min(1024) as usize);
    for _ in 0..count {
        items.push(T::read_from(reader)?);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal entity for exercising the sequence helpers.
    #[derive(Debug, PartialEq)]
    struct Word(u32);

    impl WireEncode for Word {
        fn write_to(&self, writer: &mut WireWriter) {
            writer.write_u32_le(self.0);
        }
    }

    impl WireDecode for Word {
        fn read_from(reader: &mut WireReader<'_>) -> Result<Self, TransactionError> {
            let val = reader
                .read_u32_le()
                .map_err(|e| TransactionError::MalformedEncoding(format!("reading word: {}", e)))?;
            Ok(Word(val))
        }
    }

    #[test]
    fn test_sequence_roundtrip() {
        let items = vec![Word(1), Word(0xDEADBEEF), Word(0)];
        let mut writer = WireWriter::new();
        write_sequence(&mut writer, &items);

        let bytes = writer.into_bytes();
        assert_eq!(bytes.len(), 1 + 3 * 4);

        let mut reader = WireReader::new(&bytes);
        let decoded: Vec<Word> = read_sequence(&mut reader).unwrap();
        assert_eq!(decoded, items);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_sequence_truncated() {
        // Count says 5 but only 1 element follows.
        let mut writer = WireWriter::new();
        writer.write_varint(VarInt(5));
        writer.write_u32_le(42);

        let bytes = writer.into_bytes();
        let mut reader = WireReader::new(&bytes);
        let result: Result<Vec<Word>, _> = read_sequence(&mut reader);
        assert!(matches!(result, Err(TransactionError::MalformedEncoding(_))));
    }

    #[test]
    fn test_hostile_count_does_not_allocate() {
        // A 9-byte varint claiming u64::MAX elements fails cleanly.
        let mut bytes = vec![0xff];
        bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        let mut reader = WireReader::new(&bytes);
        let result: Result<Vec<Word>, _> = read_sequence(&mut reader);
        assert!(result.is_err());
    }
}
