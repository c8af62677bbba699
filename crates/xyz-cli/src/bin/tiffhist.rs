//! tiffhist - per-channel level histogram of a TIFF image.

use xyz_cli::commands::hist::HistCli;

fn main() {
    std::process::exit(xyz_cli::launch::<HistCli>());
}
