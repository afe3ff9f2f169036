use std::fmt;
use std::str::FromStr;

use crate::bignum::{BigUnsigned, Workspace, LIMB_BITS};
use crate::error::Error;

/// Hex digits per chunk, so one chunk fits a limb with room to spare
const HEX_CHUNK: usize = 7;
/// Decimal digits per chunk
const DEC_CHUNK: usize = 8;
const DEC_CHUNK_POW: u32 = 100_000_000;

/// Invalid characters read as zero
fn digit_value(c: u8, radix: u32) -> u32 {
    (c as char).to_digit(radix).unwrap_or(0)
}

fn chunk_value(chunk: &[u8], radix: u32) -> u32 {
    chunk
        .iter()
        .fold(0, |acc, &c| acc * radix + digit_value(c, radix))
}

fn copy_digits(digits: &str, buf: &mut [u8]) -> Result<usize, Error> {
    let needed = digits.len();
    let available = buf.len();
    let out = buf
        .get_mut(..needed)
        .ok_or(Error::BufferTooSmall { needed, available })?;
    out.copy_from_slice(digits.as_bytes());
    Ok(needed)
}

/// Text conversion
impl BigUnsigned {
    /// Parse big endian hex digits, without any prefix
    pub fn set_hex(&mut self, s: &str) {
        self.set_zero();
        self.ensure_capacity(s.len() / 8 + 1);

        for chunk in s.as_bytes().chunks(HEX_CHUNK) {
            self.shift_left(4 * chunk.len() as u32);
            self.add_u32(chunk_value(chunk, 16));
        }
    }

    /// Parse decimal digits
    pub fn set_decimal(&mut self, s: &str) {
        self.set_zero();
        self.ensure_capacity(s.len() / 9 + 1);

        let mut ws = Workspace::with_capacity(self.capacity());
        for chunk in s.as_bytes().chunks(DEC_CHUNK) {
            self.mul_u32_with(10u32.pow(chunk.len() as u32), &mut ws);
            self.add_u32(chunk_value(chunk, 10));
        }
    }

    pub fn to_binary_string(&self) -> String {
        let Some(top) = self.highest_set_bit() else {
            return "0".to_string();
        };

        (0..=top)
            .rev()
            .map(|bit| if self.test_bit(bit) { '1' } else { '0' })
            .collect()
    }

    /// Upper case hex digits
    pub fn to_hex_string(&self) -> String {
        self.hex_digits(true)
    }

    pub fn to_decimal_string(&self) -> String {
        if self.is_zero() {
            return "0".to_string();
        }

        // groups of eight digits come out least significant first
        let mut groups = Vec::with_capacity(self.len * 10 / DEC_CHUNK + 1);
        let mut value = self.clone();
        while !value.is_zero() {
            let (group, _) = value.div_u32(DEC_CHUNK_POW);
            groups.push(group);
        }

        let mut out = String::with_capacity(groups.len() * DEC_CHUNK);
        let mut groups = groups.into_iter().rev();
        if let Some(top) = groups.next() {
            out.push_str(&top.to_string());
        }
        // padded groups keep the zeros inside the number, 10^8 is "1" then "00000000"
        for group in groups {
            out.push_str(&format!("{group:08}"));
        }
        out
    }

    /// Write the binary digits to the front of `buf`, returning how many bytes were used
    pub fn write_binary_into(&self, buf: &mut [u8]) -> Result<usize, Error> {
        copy_digits(&self.to_binary_string(), buf)
    }

    pub fn write_hex_into(&self, buf: &mut [u8]) -> Result<usize, Error> {
        copy_digits(&self.to_hex_string(), buf)
    }

    pub fn write_decimal_into(&self, buf: &mut [u8]) -> Result<usize, Error> {
        copy_digits(&self.to_decimal_string(), buf)
    }

    fn hex_digits(&self, upper: bool) -> String {
        let Some((top, rest)) = self.limbs().split_last() else {
            return "0".to_string();
        };

        let width = (LIMB_BITS / 4) as usize;
        let mut out = String::with_capacity(self.len * width);
        if upper {
            out.push_str(&format!("{top:X}"));
        } else {
            out.push_str(&format!("{top:x}"));
        }
        for limb in rest.iter().rev() {
            if upper {
                out.push_str(&format!("{limb:0width$X}"));
            } else {
                out.push_str(&format!("{limb:0width$x}"));
            }
        }
        out
    }
}

impl fmt::Display for BigUnsigned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(true, "", &self.to_decimal_string())
    }
}

impl fmt::LowerHex for BigUnsigned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(true, "0x", &self.hex_digits(false))
    }
}

impl fmt::UpperHex for BigUnsigned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(true, "0x", &self.hex_digits(true))
    }
}

impl fmt::Binary for BigUnsigned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(true, "0b", &self.to_binary_string())
    }
}

/// Decimal, or hex after a `0x` prefix
impl FromStr for BigUnsigned {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut out = Self::new();
        match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some("") => return Err(Error::Empty),
            Some(hex) => out.set_hex(hex),
            None if s.is_empty() => return Err(Error::Empty),
            None => out.set_decimal(s),
        }
        Ok(out)
    }
}
