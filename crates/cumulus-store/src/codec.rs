//! Encode/decode for stored arrays.
//!
//! Files use the NumPy `.npy` format (via `ndarray-npy`) so a run directory
//! can be opened by external tools. Writes store every element at the
//! configured [`Precision`]. Reads accept `f4` and `f8` files in either
//! memory order and widen to `f64`; anything else is a decode error.

use std::io::{Read, Seek, SeekFrom, Write};

use ndarray::ArrayD;
use ndarray_npy::{ReadNpyError, ReadNpyExt, WriteNpyExt};

use cumulus_core::{FieldArray, Precision};

use crate::error::StoreError;

/// Encode `array` as a complete `.npy` file, rounding to `precision`.
pub fn encode_array<W: Write>(
    w: W,
    array: &FieldArray,
    precision: Precision,
) -> Result<(), StoreError> {
    let view = array.view();
    match precision {
        Precision::F32 => view.mapv(|v| v as f32).write_npy(w)?,
        Precision::F64 => view.write_npy(w)?,
    }
    Ok(())
}

/// Decode a complete `.npy` file into an `f64` array.
///
/// Returns the array together with the precision the file was written at.
pub fn decode_array<R: Read + Seek>(r: &mut R) -> Result<(FieldArray, Precision), StoreError> {
    let start = r.stream_position()?;
    match ArrayD::<f32>::read_npy(&mut *r) {
        Ok(a) => return Ok((FieldArray::from(a.mapv(f64::from)), Precision::F32)),
        Err(ReadNpyError::WrongDescriptor(_)) => {}
        Err(e) => return Err(e.into()),
    }
    r.seek(SeekFrom::Start(start))?;
    let a = ArrayD::<f64>::read_npy(&mut *r)?;
    Ok((FieldArray::from(a), Precision::F64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{IxDyn, ShapeBuilder};
    use proptest::prelude::*;
    use std::io::Cursor;

    /// A v1.0 file with a hand-written header dict and raw body.
    fn npy_file(dict: &str, body: &[u8]) -> Vec<u8> {
        let mut header = dict.to_string();
        let unpadded = 10 + header.len() + 1;
        header.extend(std::iter::repeat_n(' ', (64 - unpadded % 64) % 64));
        header.push('\n');
        let mut buf = b"\x93NUMPY\x01\x00".to_vec();
        buf.extend_from_slice(&(header.len() as u16).to_le_bytes());
        buf.extend_from_slice(header.as_bytes());
        buf.extend_from_slice(body);
        buf
    }

    fn encode(array: &FieldArray, precision: Precision) -> Vec<u8> {
        let mut buf = Vec::new();
        encode_array(&mut buf, array, precision).unwrap();
        buf
    }

    #[test]
    fn header_is_numpy_v1_with_aligned_data() {
        let buf = encode(&FieldArray::filled(&[4, 5], 1.0), Precision::F32);
        assert_eq!(&buf[..8], b"\x93NUMPY\x01\x00");
        let header_len = u16::from_le_bytes([buf[8], buf[9]]) as usize;
        assert_eq!((10 + header_len) % 16, 0);
        let text = std::str::from_utf8(&buf[10..10 + header_len]).unwrap();
        assert!(text.contains("'descr': '<f4'"));
        assert!(text.contains("'fortran_order': False"));
        assert!(text.contains("'shape': (4, 5)"));
        assert_eq!(buf.len(), 10 + header_len + 20 * 4);
    }

    #[test]
    fn precision_is_read_back_from_header() {
        let array = FieldArray::from_vec(vec![1.0 / 3.0, 2.0]);
        let (got, precision) =
            decode_array(&mut Cursor::new(encode(&array, Precision::F64))).unwrap();
        assert_eq!(precision, Precision::F64);
        assert_eq!(got, array);

        let (got, precision) =
            decode_array(&mut Cursor::new(encode(&array, Precision::F32))).unwrap();
        assert_eq!(precision, Precision::F32);
        assert_eq!(got, array.reduced(Precision::F32));
    }

    #[test]
    fn scalar_shape_holds_one_element() {
        let array = FieldArray::new(&[], vec![2.5]).unwrap();
        let (got, _) = decode_array(&mut Cursor::new(encode(&array, Precision::F32))).unwrap();
        assert_eq!(got, array);
    }

    #[test]
    fn fortran_ordered_file_loads_in_c_order() {
        let f = ArrayD::from_shape_vec(IxDyn(&[2, 3]).f(), (0..6).map(f64::from).collect())
            .unwrap();
        let mut buf = Vec::new();
        f.write_npy(&mut buf).unwrap();
        let (got, _) = decode_array(&mut Cursor::new(buf)).unwrap();
        assert_eq!(got.shape(), &[2, 3]);
        assert_eq!(got.get(&[1, 0]), Some(1.0));
        assert_eq!(got.get(&[0, 2]), Some(4.0));
    }

    #[test]
    fn bad_magic_is_decode_error() {
        let mut buf = encode(&FieldArray::from_vec(vec![1.0]), Precision::F32);
        buf[5] = b'Z';
        let err = decode_array(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[test]
    fn integer_dtype_is_decode_error() {
        let buf = npy_file(
            "{'descr': '<i4', 'fortran_order': False, 'shape': (2,), }",
            &[0; 8],
        );
        let err = decode_array(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Decode(ReadNpyError::WrongDescriptor(_))
        ));
    }

    #[test]
    fn overflowing_shape_is_decode_error() {
        let buf = npy_file(
            "{'descr': '<f4', 'fortran_order': False, 'shape': (4294967296, 4294967296, 16), }",
            &[0; 16],
        );
        let err = decode_array(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)), "{err}");
        assert!(!err.is_not_found());
    }

    #[test]
    fn truncated_body_is_decode_error() {
        let mut buf = encode(&FieldArray::filled(&[4, 5], 1.0), Precision::F32);
        buf.truncate(buf.len() - 3);
        assert!(matches!(
            decode_array(&mut Cursor::new(buf)),
            Err(StoreError::Decode(_))
        ));
    }

    #[test]
    fn truncated_header_is_decode_error() {
        let buf = b"\x93NUMPY\x02\x00\x00\x10\x00\x00{'descr'".to_vec();
        assert!(matches!(
            decode_array(&mut Cursor::new(buf)),
            Err(StoreError::Decode(_))
        ));
    }

    proptest! {
        #[test]
        fn f32_body_matches_reduced_input(
            values in prop::collection::vec(-1e30f64..1e30, 1..48)
        ) {
            let array = FieldArray::from_vec(values);
            let (got, _) =
                decode_array(&mut Cursor::new(encode(&array, Precision::F32))).unwrap();
            prop_assert_eq!(got, array.reduced(Precision::F32));
        }
    }
}
