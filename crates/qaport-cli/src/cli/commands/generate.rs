use anyhow::{Context, Result};
use qaport_storage::generate_test_file;

use crate::cli::args::GenerateArgs;
use crate::exit_codes::SUCCESS;

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

pub async fn run(args: GenerateArgs) -> Result<i32> {
    let size_bytes = gib_to_bytes(args.size_gb);
    let path = generate_test_file(&args.name, &args.extension, size_bytes, &args.dir_path)
        .await
        .with_context(|| format!("failed to generate {}.{}", args.name, args.extension))?;

    println!("{} ({} bytes)", path.display(), size_bytes);
    Ok(SUCCESS)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn gib_to_bytes(size_gb: f64) -> u64 {
    (size_gb * BYTES_PER_GIB) as u64
}
