use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use tracing::{error, trace};

use crate::common::error::{QRError, QRResult};

// Reed Solomon codec parameters
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct RSParams {
    // Bits per symbol
    pub symsize: usize,
    // Field generator polynomial
    pub gfpoly: usize,
    // First consecutive root, index form
    pub fcr: usize,
    // Primitive element, index form
    pub prim: usize,
    // Parity symbols per block
    pub nroots: usize,
    // Padding bytes of the shortened code
    pub pad: usize,
}

impl RSParams {
    // GF(256) over 0x11D with roots starting at alpha^0
    pub fn qr(data_len: usize, ecc_len: usize) -> Self {
        Self {
            symsize: 8,
            gfpoly: 0x11D,
            fcr: 0,
            prim: 1,
            nroots: ecc_len,
            pad: 255usize.saturating_sub(data_len + ecc_len),
        }
    }
}

// Reed Solomon codec
//------------------------------------------------------------------------------

#[derive(Debug)]
pub struct ReedSolomon {
    params: RSParams,
    // Symbol size & symbols per block
    mm: usize,
    nn: usize,
    alpha_to: Vec<usize>,
    index_of: Vec<usize>,
    // Generator polynomial, index form
    genpoly: Vec<usize>,
}

impl ReedSolomon {
    pub fn new(params: RSParams) -> QRResult<Self> {
        let RSParams { symsize, gfpoly, fcr, prim, nroots, pad } = params;

        if symsize == 0 || symsize > 8 {
            return Err(invalid_params(params, "Symbol size out of range"));
        }
        let nn = (1 << symsize) - 1;
        if fcr > nn {
            return Err(invalid_params(params, "First root out of range"));
        }
        if prim == 0 || prim > nn {
            return Err(invalid_params(params, "Primitive element out of range"));
        }
        if nroots > nn {
            return Err(invalid_params(params, "Parity length out of range"));
        }
        if pad >= nn - nroots {
            return Err(invalid_params(params, "Padding out of range"));
        }

        let mm = symsize;
        let a0 = nn;
        let mut alpha_to = vec![0; nn + 1];
        let mut index_of = vec![0; nn + 1];
        index_of[0] = a0;
        alpha_to[a0] = 0;
        let mut sr = 1;
        for i in 0..nn {
            index_of[sr] = i;
            alpha_to[i] = sr;
            sr <<= 1;
            if sr & (1 << mm) != 0 {
                sr ^= gfpoly;
            }
            sr &= nn;
        }
        if sr != 1 {
            return Err(invalid_params(params, "Field generator polynomial is not primitive"));
        }

        let mut rs = Self { params, mm, nn, alpha_to, index_of, genpoly: vec![0; nroots + 1] };
        rs.build_genpoly();
        trace!(?params, "Reed Solomon codec initialised");
        Ok(rs)
    }

    fn build_genpoly(&mut self) {
        let RSParams { fcr, prim, nroots, .. } = self.params;
        let mut genpoly = vec![0; nroots + 1];
        genpoly[0] = 1;
        let mut root = fcr * prim;
        for i in 0..nroots {
            genpoly[i + 1] = 1;
            // Multiply by (x + alpha^root)
            for j in (1..=i).rev() {
                genpoly[j] = if genpoly[j] != 0 {
                    genpoly[j - 1] ^ self.alpha_to[self.modnn(self.index_of[genpoly[j]] + root)]
                } else {
                    genpoly[j - 1]
                };
            }
            genpoly[0] = self.alpha_to[self.modnn(self.index_of[genpoly[0]] + root)];
            root += prim;
        }
        self.genpoly = genpoly.into_iter().map(|g| self.index_of[g]).collect();
    }

    fn modnn(&self, mut x: usize) -> usize {
        while x >= self.nn {
            x -= self.nn;
            x = (x >> self.mm) + (x & self.nn);
        }
        x
    }

    // Systematic LFSR encoder, returns the parity symbols
    pub fn encode(&self, data: &[u8]) -> Vec<u8> {
        let nroots = self.params.nroots;
        let a0 = self.nn;
        debug_assert!(
            data.len() + nroots + self.params.pad <= self.nn,
            "Block exceeds code length: Data {}, Parity {nroots}, Pad {}",
            data.len(),
            self.params.pad
        );

        let mut parity = vec![0usize; nroots];
        if nroots == 0 {
            return Vec::new();
        }
        for &d in data {
            let fb = self.index_of[d as usize ^ parity[0]];
            if fb != a0 {
                for j in 1..nroots {
                    parity[j] ^= self.alpha_to[self.modnn(fb + self.genpoly[nroots - j])];
                }
            }
            parity.rotate_left(1);
            parity[nroots - 1] =
                if fb != a0 { self.alpha_to[self.modnn(fb + self.genpoly[0])] } else { 0 };
        }
        parity.into_iter().map(|p| p as u8).collect()
    }
}

fn invalid_params(params: RSParams, msg: &'static str) -> QRError {
    error!(?params, "{msg}");
    QRError::InternalInconsistency(msg)
}

// Codec cache
//------------------------------------------------------------------------------

static RS_CACHE: OnceLock<RwLock<HashMap<RSParams, Arc<ReedSolomon>>>> = OnceLock::new();

// Codecs are built once per parameter set and shared read only afterwards
pub fn rs_codec(params: RSParams) -> QRResult<Arc<ReedSolomon>> {
    let cache = RS_CACHE.get_or_init(Default::default);
    if let Some(rs) = cache.read().unwrap_or_else(|e| e.into_inner()).get(&params) {
        return Ok(Arc::clone(rs));
    }

    let rs = Arc::new(ReedSolomon::new(params)?);
    let mut cache = cache.write().unwrap_or_else(|e| e.into_inner());
    Ok(Arc::clone(cache.entry(params).or_insert(rs)))
}

// Parity codewords for one data block
pub fn ecc(data: &[u8], ecc_len: usize) -> QRResult<Vec<u8>> {
    let rs = rs_codec(RSParams::qr(data.len(), ecc_len))?;
    Ok(rs.encode(data))
}

#[cfg(test)]
mod galois_tests {
    use std::sync::Arc;

    use test_case::test_case;

    use super::{ecc, rs_codec, RSParams, ReedSolomon};
    use crate::common::error::QRError;

    #[test]
    fn test_field_tables() {
        let rs = ReedSolomon::new(RSParams::qr(16, 10)).unwrap();
        assert_eq!(rs.alpha_to[0], 1);
        assert_eq!(rs.alpha_to[1], 2);
        assert_eq!(rs.alpha_to[8], 0x1D);
        assert_eq!(rs.alpha_to[254], 0x8E);
        assert_eq!(rs.index_of[1], 0);
        assert_eq!(rs.index_of[0], 255);
        assert_eq!(rs.index_of[0x1D], 8);
    }

    #[test]
    fn test_genpoly() {
        // (x - 1)(x - 2) = x^2 + 3x + 2, coefficients stored low order first
        let rs = ReedSolomon::new(RSParams::qr(10, 2)).unwrap();
        assert_eq!(rs.genpoly, [rs.index_of[2], rs.index_of[3], rs.index_of[1]]);
    }

    #[test]
    fn test_reference_vector() {
        let data = [
            0x10, 0x20, 0x0C, 0x56, 0x61, 0x80, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11,
            0xEC, 0x11,
        ];
        let exp = [0xA5, 0x24, 0xD4, 0xC1, 0xED, 0x36, 0xC7, 0x87, 0x2C, 0x55];
        assert_eq!(ecc(&data, 10).unwrap(), exp);
    }

    #[test_case(b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11", b"\xc4#'w\xeb\xd7\xe7\xe2]\x17")]
    #[test_case(b" [\x0bx\xd1r\xdcMC@\xec\x11\xec", b"\xa8H\x16R\xd96\x9c\x00.\x0f\xb4z\x10")]
    #[test_case(b"CUF\x86W&U\xc2w2\x06\x12\x06g&", b"\xd5\xc7\x0b-s\xf7\xf1\xdf\xe5\xf8\x9au\x9aoV\xa1o'")]
    fn test_ecc(data: &[u8], exp: &[u8]) {
        assert_eq!(ecc(data, exp.len()).unwrap(), exp);
    }

    #[test]
    fn test_codec_cache_shares_instances() {
        let a = rs_codec(RSParams::qr(19, 7)).unwrap();
        let b = rs_codec(RSParams::qr(19, 7)).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        let c = rs_codec(RSParams::qr(16, 10)).unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn test_concurrent_cache_access() {
        let handles = (0..8)
            .map(|i| std::thread::spawn(move || rs_codec(RSParams::qr(20 + i % 2, 22)).unwrap()))
            .collect::<Vec<_>>();
        let codecs = handles.into_iter().map(|h| h.join().unwrap()).collect::<Vec<_>>();
        for pair in codecs.iter().step_by(2).zip(codecs.iter().skip(2).step_by(2)) {
            assert!(Arc::ptr_eq(pair.0, pair.1));
        }
    }

    #[test_case(RSParams { symsize: 9, ..RSParams::qr(10, 2) }, "Symbol size out of range")]
    #[test_case(RSParams { prim: 0, ..RSParams::qr(10, 2) }, "Primitive element out of range")]
    #[test_case(RSParams { pad: 253, ..RSParams::qr(10, 2) }, "Padding out of range")]
    #[test_case(RSParams { gfpoly: 0x100, ..RSParams::qr(10, 2) }, "Field generator polynomial is not primitive")]
    fn test_invalid_params(params: RSParams, msg: &'static str) {
        assert_eq!(ReedSolomon::new(params).unwrap_err(), QRError::InternalInconsistency(msg));
    }
}
