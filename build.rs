fn main() {
    // WIFI_SSID, WIFI_PASS, CLOCK_TIMEZONE and CLOCK_ZONES come from .env
    dotenv_build::output(dotenv_build::Config::default()).unwrap();

    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }
}
