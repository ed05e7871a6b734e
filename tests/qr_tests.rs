#[cfg(test)]
mod qr_proptests {

    use prop::string::string_regex;
    use proptest::prelude::*;

    use qrforge::*;

    pub fn ec_level_strategy() -> BoxedStrategy<ECLevel> {
        prop_oneof![Just(ECLevel::L), Just(ECLevel::M), Just(ECLevel::Q), Just(ECLevel::H)].boxed()
    }

    pub fn qr_strategy(regex: &str, max_sz: usize) -> impl Strategy<Value = (ECLevel, String)> {
        let pattern = format!(r"{regex}{{1,{max_sz}}}");
        (ec_level_strategy(), string_regex(&pattern).unwrap())
    }

    fn scan(qr: &QR) -> String {
        let img = qr.to_image(3);
        let (w, h) = img.dimensions();
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            w as usize,
            h as usize,
            |x, y| img.get_pixel(x as u32, y as u32).0[0],
        );
        let grids = prepared.detect_grids();
        assert_eq!(grids.len(), 1);
        let (meta, content) = grids[0].decode().expect("Failed to read QR");
        assert_eq!(meta.version.0, *qr.version());
        content
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn proptest_numeric(params in qr_strategy("[0-9]", 400)) {
            let (ecl, data) = params;
            let qr = QRBuilder::new(data.as_bytes()).ec_level(ecl).build().unwrap();
            prop_assert_eq!(data, scan(&qr));
        }

        #[test]
        fn proptest_alphanumeric(params in qr_strategy(r"[0-9A-Z $%*+\-./:]", 300)) {
            let (ecl, data) = params;
            let qr = QRBuilder::new(data.as_bytes()).ec_level(ecl).build().unwrap();
            prop_assert_eq!(data, scan(&qr));
        }

        #[test]
        fn proptest_mixed(params in qr_strategy(r"[0-9A-Za-z $%*+\-./:,;!?#@&]", 200)) {
            let (ecl, data) = params;
            let qr = QRBuilder::new(data.as_bytes()).ec_level(ecl).build().unwrap();
            prop_assert_eq!(data, scan(&qr));
        }

        #[test]
        fn proptest_mask_determinism(
            data in prop::collection::vec(any::<u8>(), 1..200),
            ecl in ec_level_strategy(),
            detect_kanji in any::<bool>(),
        ) {
            let build = || QRBuilder::new(&data).ec_level(ecl).detect_kanji(detect_kanji).build();
            let (a, b) = (build().unwrap(), build().unwrap());
            prop_assert_eq!(a.mask(), b.mask());
            prop_assert_eq!(a.to_matrix(), b.to_matrix());
        }

        #[test]
        fn proptest_sampled_mask_determinism(
            data in prop::collection::vec(any::<u8>(), 1..100),
            count in 1usize..=8,
            seed in any::<u64>(),
        ) {
            let search = MaskSearch::Sampled { count, seed };
            let build = || QRBuilder::new(&data).mask_search(search).build();
            let (a, b) = (build().unwrap(), build().unwrap());
            prop_assert_eq!(a.mask(), b.mask());
            prop_assert!(search.candidates().contains(&a.mask().unwrap()));
            prop_assert_eq!(a.to_matrix(), b.to_matrix());
        }

        #[test]
        fn proptest_capacity_monotonicity(
            data in prop::collection::vec(any::<u8>(), 2..600),
            ecl in ec_level_strategy(),
            cut in any::<prop::sample::Index>(),
        ) {
            let prefix = &data[..1 + cut.index(data.len() - 1)];
            let short = QRBuilder::new(prefix).ec_level(ecl).build().unwrap();
            let long = QRBuilder::new(&data).ec_level(ecl).build().unwrap();
            prop_assert!(short.version() <= long.version());
        }
    }
}

#[cfg(test)]
mod capacity_tests {
    use test_case::test_case;

    use qrforge::*;

    #[test_case("1", 7089, ECLevel::L, 23648)]
    #[test_case("1", 3057, ECLevel::H, 10208)]
    #[test_case("A", 4296, ECLevel::L, 23648)]
    #[test_case("a", 2953, ECLevel::L, 23648)]
    #[test_case("a", 1273, ECLevel::H, 10208)]
    fn test_version_40_boundary(unit: &str, max_len: usize, ecl: ECLevel, capacity_bits: usize) {
        let data = unit.repeat(max_len);
        let qr = QRBuilder::new(data.as_bytes()).ec_level(ecl).build().unwrap();
        assert_eq!(*qr.version(), 40);

        let data = unit.repeat(max_len + 1);
        match QRBuilder::new(data.as_bytes()).ec_level(ecl).build() {
            Err(QRError::CapacityExceeded { required_bits, capacity_bits: cap }) => {
                assert_eq!(cap, capacity_bits);
                assert!(required_bits > cap);
            }
            res => panic!("Expected capacity error, got {:?}", res.map(|qr| qr.metadata())),
        }
    }

    #[test]
    fn test_numeric_boundary_scans() {
        let data = "9".repeat(3057);
        let qr = QRBuilder::new(data.as_bytes()).ec_level(ECLevel::H).build().unwrap();
        let img = qr.to_image(2);
        let (w, h) = img.dimensions();
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            w as usize,
            h as usize,
            |x, y| img.get_pixel(x as u32, y as u32).0[0],
        );
        let grids = prepared.detect_grids();
        let (_, content) = grids[0].decode().unwrap();
        assert_eq!(content, data);
    }

    #[test]
    fn test_invalid_arguments() {
        assert_eq!(QRBuilder::new(b"").build().unwrap_err(), QRError::EmptyData);
        assert_eq!("X".parse::<ECLevel>(), Err(QRError::InvalidECLevel));
        assert_eq!(MaskPattern::try_from(8), Err(QRError::InvalidMaskPattern));
    }

    #[test]
    fn test_version_grows_with_level() {
        let data = "QRFORGE 0123456789".repeat(10);
        let versions = [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H]
            .map(|ecl| *QRBuilder::new(data.as_bytes()).ec_level(ecl).build().unwrap().version());
        assert!(versions.windows(2).all(|w| w[0] <= w[1]), "{versions:?}");
    }
}

#[cfg(test)]
mod kanji_tests {
    use qrforge::*;

    // "点茗" in Shift JIS
    const KANJI: &[u8] = &[0x93, 0x5F, 0xE4, 0xAA];

    #[test]
    fn test_kanji_mode_is_smaller() {
        let data = KANJI.repeat(20);
        let kanji = QRBuilder::new(&data).detect_kanji(true).build().unwrap();
        let bytes = QRBuilder::new(&data).build().unwrap();
        assert!(kanji.version() < bytes.version());
    }

    #[test]
    fn test_kanji_scans() {
        let data = KANJI.repeat(4);
        let qr = QRBuilder::new(&data).detect_kanji(true).ec_level(ECLevel::M).build().unwrap();
        let img = qr.to_image(4);
        let (w, h) = img.dimensions();
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            w as usize,
            h as usize,
            |x, y| img.get_pixel(x as u32, y as u32).0[0],
        );
        let grids = prepared.detect_grids();
        assert_eq!(grids.len(), 1);
        let mut raw = Vec::new();
        let meta = grids[0].decode_to(&mut raw).unwrap();
        assert_eq!(meta.version.0, *qr.version());
        assert_eq!(raw, data);
    }
}
