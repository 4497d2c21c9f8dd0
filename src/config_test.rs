use super::default_got_config;

#[test]
fn test_default_got_config() {
    let conf = default_got_config();
    assert!(conf.is_ok(), "{:?}", conf);
    let conf = conf.unwrap();
    assert_eq!(conf.seed, 0);
    assert!(conf.sound);
    assert_eq!(conf.start_area, 1);
}

#[test]
fn test_partial_config_fills_defaults() {
    let conf: super::GotConfig = toml::from_str("seed = 99").expect("parse");
    assert_eq!(conf.seed, 99);
    assert!(conf.sound);
    assert_eq!(conf.start_area, 1);
}
