const CONFIG_VARS: [&str; 5] = [
    "TXOKO_WIFI_SSID",
    "TXOKO_WIFI_PASS",
    "TXOKO_TZ",
    "TXOKO_PRICE_URL",
    "TXOKO_PRICE_POINTER",
];

fn main() {
    println!("cargo:rerun-if-changed=sdkconfig.defaults");
    for var in CONFIG_VARS {
        println!("cargo:rerun-if-env-changed={}", var);
    }

    if std::env::var("ESP_IDF_SDKCONFIG_DEFAULTS").is_err() {
        eprintln!("WARNING: ESP_IDF_SDKCONFIG_DEFAULTS not set! Stack size may be wrong.");
        eprintln!("Build with: export ESP_IDF_SDKCONFIG_DEFAULTS=crates/txoko-firmware/sdkconfig.defaults");
    }

    embuild::espidf::sysenv::output();
}
