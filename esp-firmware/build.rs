// Build-Script: Wird vor dem Kompilieren ausgeführt
// Backt die .env Konfiguration ein und konfiguriert den Linker für ESP32-C6

/// Variablen, die aus .env (oder der Umgebung) in den Code eingebacken werden
const BAKED_ENV_VARS: [&str; 5] = [
    "WIFI_SSID",
    "WIFI_PASSWORD",
    "MQTT_BROKER",
    "MQTT_CLIENT_ID",
    "MQTT_TOPIC_CHANNELS",
];

fn main() {
    // Fehlt .env, müssen die Variablen in der Umgebung gesetzt sein
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  .env file nicht gefunden: {}", e);
        eprintln!("   Setze {} als Environment-Variablen", BAKED_ENV_VARS.join(", "));
    }

    for key in BAKED_ENV_VARS {
        println!("cargo:rerun-if-env-changed={}", key);
        if let Ok(value) = std::env::var(key) {
            println!("cargo:rustc-env={}={}", key, value);
        }
    }
    println!("cargo:rerun-if-changed=.env");

    linker_be_nice();

    // defmt.x - Symbole für defmt's binäres Log-Format
    println!("cargo:rustc-link-arg=-Tdefmt.x");

    // linkall.x - Memory-Layout, muss als LETZTES kommen
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}

/// Hinweis-Text für bekannte undefinierte Symbole
fn hint_for_symbol(symbol: &str) -> Option<&'static str> {
    match symbol {
        s if s.starts_with("_defmt_") => Some(
            "`defmt` not found - make sure `defmt.x` is added as a linker script and esp-println is linked",
        ),
        "_stack_start" => Some("Is the linker script `linkall.x` missing?"),
        s if s.starts_with("esp_rtos_") => Some(
            "`esp-radio` has no scheduler enabled. Make sure `esp_rtos::start` is called in main",
        ),
        "free" | "malloc" | "calloc" | "get_free_internal_heap_size" | "malloc_internal"
        | "realloc_internal" | "calloc_internal" | "free_internal" => {
            Some("Did you forget the `esp-alloc` dependency?")
        }
        _ => None,
    }
}

// Error-Handler: Wird vom Linker als "--error-handling-script" aufgerufen
fn linker_be_nice() {
    let args: Vec<String> = std::env::args().collect();

    if let [_, kind, what, ..] = args.as_slice() {
        if kind != "undefined-symbol" {
            std::process::exit(1);
        }
        if let Some(hint) = hint_for_symbol(what) {
            eprintln!();
            eprintln!("💡 {}", hint);
            eprintln!();
        }
        std::process::exit(0);
    }

    if let Ok(exe) = std::env::current_exe() {
        println!(
            "cargo:rustc-link-arg=--error-handling-script={}",
            exe.display()
        );
    }
}
