//! tiffdiff - per-sample absolute difference of two TIFF images.

use xyz_cli::commands::diff::DiffCli;

fn main() {
    std::process::exit(xyz_cli::launch::<DiffCli>());
}
