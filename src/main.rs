//! Flipbook CLI stub (for testing purposes only)
//! The main interface is through WASM bindings.

fn main() {
    println!("Flipbook Navigation Core");
    println!("========================");
    println!();
    println!("This is a library crate. To use it:");
    println!();
    println!("  1. Build WASM: wasm-pack build --target web");
    println!("  2. Serve the viewer page next to the generated pkg/");
    println!();
    println!("For testing the core library:");
    println!("  cargo test");
}
