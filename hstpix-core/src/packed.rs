//! Packed little-endian integer fields.
//!
//! The `.hst` format stores integers in byte widths that have no native
//! type (the 6-byte event timestamp, the 4/6 split inside the header's
//! origin timestamp). These helpers copy such a field into a zeroed buffer
//! of the target width and only then interpret it, so the high-order bytes
//! are always zero regardless of what follows the field in the file.

/// An unsigned integer that a narrower little-endian field can be widened into.
pub trait ZeroExtend: Copy {
    /// Width of the target integer in bytes.
    const WIDTH: usize;

    /// Widens `bytes` (at most [`Self::WIDTH`] long) into `Self`.
    ///
    /// Returns `None` if the field is wider than the target.
    fn from_le_prefix(bytes: &[u8]) -> Option<Self>;

    /// Lossless conversion to `u64` for truncating writes.
    fn to_u64(self) -> u64;
}

macro_rules! impl_zero_extend {
    ($($t:ty),*) => {
        $(
            impl ZeroExtend for $t {
                const WIDTH: usize = std::mem::size_of::<$t>();

                #[inline]
                fn from_le_prefix(bytes: &[u8]) -> Option<Self> {
                    if bytes.len() > Self::WIDTH {
                        return None;
                    }
                    let mut buf = [0u8; std::mem::size_of::<$t>()];
                    buf[..bytes.len()].copy_from_slice(bytes);
                    Some(<$t>::from_le_bytes(buf))
                }

                #[inline]
                fn to_u64(self) -> u64 {
                    u64::from(self)
                }
            }
        )*
    };
}

impl_zero_extend!(u8, u16, u32, u64);

/// Zero-extends an `N`-byte little-endian field into `T`.
///
/// The width check happens at compile time, so a field wider than the
/// target does not build.
///
/// ```
/// use hstpix_core::zero_extend_le;
///
/// let ticks: u64 = zero_extend_le([0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
/// assert_eq!(ticks, 0x0605_0403_0201);
/// ```
#[inline]
#[must_use]
pub fn zero_extend_le<T: ZeroExtend, const N: usize>(bytes: [u8; N]) -> T {
    const { assert!(N <= T::WIDTH, "packed field is wider than the target integer") };
    match T::from_le_prefix(&bytes) {
        Some(value) => value,
        None => unreachable!("width checked at compile time"),
    }
}

/// Returns the low `N` bytes of `value` in little-endian order.
///
/// Bytes above `N` are discarded; use [`fits_in`] first when that matters.
#[inline]
#[must_use]
pub fn truncate_le<T: ZeroExtend, const N: usize>(value: T) -> [u8; N] {
    const { assert!(N <= 8, "packed field is wider than u64") };
    let wide = value.to_u64().to_le_bytes();
    let mut out = [0u8; N];
    out.copy_from_slice(&wide[..N]);
    out
}

/// Returns true if `value` can be stored in `n_bytes` without loss.
#[inline]
#[must_use]
pub fn fits_in(value: u64, n_bytes: usize) -> bool {
    n_bytes >= 8 || value >> (n_bytes * 8) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_byte_timestamp() {
        let ts: u64 = zero_extend_le([0xFF; 6]);
        assert_eq!(ts, 0xFFFF_FFFF_FFFF);
    }

    #[test]
    fn test_four_byte_into_u32() {
        let ns: u32 = zero_extend_le([0x78, 0x56, 0x34, 0x12]);
        assert_eq!(ns, 0x1234_5678);
    }

    #[test]
    fn test_narrow_into_wide() {
        let v: u64 = zero_extend_le([0x2A]);
        assert_eq!(v, 42);
        let v: u16 = zero_extend_le([0x01, 0x01]);
        assert_eq!(v, 257);
    }

    #[test]
    fn test_from_le_prefix_rejects_wide_field() {
        assert_eq!(u32::from_le_prefix(&[0u8; 5]), None);
        assert_eq!(u32::from_le_prefix(&[]), Some(0));
    }

    #[test]
    fn test_truncate_inverts_zero_extend() {
        let bytes: [u8; 6] = truncate_le(0x0000_BEEF_CAFE_F00Du64);
        assert_eq!(bytes, [0x0D, 0xF0, 0xFE, 0xCA, 0xEF, 0xBE]);
        let back: u64 = zero_extend_le(bytes);
        assert_eq!(back, 0xBEEF_CAFE_F00D);
    }

    #[test]
    fn test_fits_in() {
        assert!(fits_in(0xFFFF_FFFF_FFFF, 6));
        assert!(!fits_in(0x1_0000_0000_0000, 6));
        assert!(fits_in(u64::MAX, 8));
        assert!(fits_in(0, 0));
    }
}
