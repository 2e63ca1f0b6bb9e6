/// Fly3D Terminal Demo - Fly around a cube
///
/// Demonstrates the first-person camera with the terminal-based ASCII rasterizer.
/// Controls:
///   - WASD: Move forward / left / backward / right
///   - Arrow Keys: Look around
///   - Q/ESC: Quit
use fly3d_core::Mesh;
use fly3d_terminal::{AppConfig, TerminalApp};
use std::io;

fn main() -> io::Result<()> {
    env_logger::init();
    println!("Fly3D Terminal Renderer - Loading...");

    // Create a cube mesh
    let cube = Mesh::cube(2.0);

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    // Run the terminal app
    let mut app = TerminalApp::new(cube, AppConfig::default())?;
    app.run()?;

    println!("Thank you for using Fly3D Terminal Renderer!");
    Ok(())
}
