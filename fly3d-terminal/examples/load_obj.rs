/// Example: Load an OBJ model and fly around it in the terminal
///
/// Usage: cargo run --example load_obj -- path/to/model.obj [--zero-based]
use fly3d_core::obj::{self, IndexBase, ObjOptions};
use fly3d_terminal::{AppConfig, TerminalApp};
use std::env;
use std::io;

fn main() -> io::Result<()> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <obj-file> [--zero-based]", args[0]);
        eprintln!("\nNo model provided, using default cube...");
        // Use default cube
        let cube = fly3d_core::Mesh::cube(2.0);
        let mut app = TerminalApp::new(cube, AppConfig::default())?;
        return app.run();
    }

    let model_path = &args[1];
    let options = ObjOptions {
        index_base: if args.iter().any(|a| a == "--zero-based") {
            IndexBase::Zero
        } else {
            IndexBase::One
        },
    };

    println!("Loading model: {}", model_path);

    // Read the whole file, then parse it
    let mesh = obj::load_with(model_path, &options).map_err(|e| {
        io::Error::new(io::ErrorKind::InvalidData, format!("Failed to load model: {}", e))
    })?;

    println!("Loaded {} triangles", mesh.triangle_count());
    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    // Run the terminal app
    let mut app = TerminalApp::new(mesh, AppConfig::default())?;
    app.run()?;

    println!("Thank you for using Fly3D Terminal Renderer!");
    Ok(())
}
