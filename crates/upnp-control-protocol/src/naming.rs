//! Translation from declared argument names to the wire field convention.

use regex::Regex;
use std::sync::LazyLock;

static CAPITAL_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("static regex"));
static LOWER_THEN_CAPITAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z\d])([A-Z])").expect("static regex"));

/// Convert a CamelCase argument name into its lowercase, underscore-separated
/// wire form (`GetMediaInfo` -> `get_media_info`, `InstanceID` -> `instance_id`).
pub fn to_wire_name(name: &str) -> String {
    let name = name.replace("::", "/");
    let name = CAPITAL_RUN.replace_all(&name, "${1}_${2}");
    let name = LOWER_THEN_CAPITAL.replace_all(&name, "${1}_${2}");
    name.replace('-', "_").to_lowercase()
}
