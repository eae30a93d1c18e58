//! Factor listing command implementation.

use deepvalue_factors::{available_factors, composite_factors};

/// List the valuation factors and whether they feed the composite index.
pub(crate) fn run() {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                    Valuation Factors                         ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let composite = composite_factors();
    for info in available_factors() {
        let status = if composite.contains(&info.kind) {
            "composite"
        } else {
            "unavailable"
        };
        println!("  {:<18} {:<12} {}", info.kind.name(), status, info.description);
    }
    println!();
}
