use std::{
    env,
    sync::Once,
};

static INIT_LOGGING: Once = Once::new();
const DEFAULT_LOG_LEVEL: &'static str = "info";
const VERBOSE_CRATES: [&'static str; 1] = ["openvr"];

fn non_blank_env(k: &str) -> Option<String> {
    env::var(k)
        .ok()
        .filter(|v| !v.is_empty())
}

fn append_log_level(crate_name: &str, level: &str) {
    let new_value = match non_blank_env("RUST_LOG") {
        Some(previous) => format!("{},{}={}", previous, crate_name, level),
        None => format!("{}={}", crate_name, level),
    };
    env::set_var("RUST_LOG", &new_value);
}

fn list_has_crate(v: &str, crate_name: &str) -> bool {
    let prefix = format!("{}=", crate_name);
    v.split(',').any(|s| s.starts_with(&prefix))
}

fn has_crate(crate_name: &str) -> bool {
    non_blank_env("RUST_LOG")
        .map(|v| list_has_crate(&v, crate_name))
        .unwrap_or(false)
}

/// Initializes env_logger once per process. `VRSHIM_LOG` picks the level for
/// this crate (and the wrapper crate at debug or trace) unless the host's
/// `RUST_LOG` already names it.
pub fn init() {
    INIT_LOGGING.call_once(|| {
        let level = non_blank_env("VRSHIM_LOG")
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        if !has_crate(crate::CRATE_NAME) {
            append_log_level(crate::CRATE_NAME, &level);
            if level == "trace" || level == "debug" {
                VERBOSE_CRATES.iter().for_each(|verbose_crate| {
                    append_log_level(verbose_crate, &level);
                });
            }
        }
        env_logger::init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_lookup_matches_whole_names_only() {
        assert!(list_has_crate("vrshim=debug", "vrshim"));
        assert!(list_has_crate("warn,vrshim=debug,openvr=trace", "openvr"));
        assert!(!list_has_crate("vrshim_extras=debug", "vrshim"));
        assert!(!list_has_crate("warn", "vrshim"));
    }
}
