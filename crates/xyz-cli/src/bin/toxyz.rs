//! toxyz - convert RGB TIFF images to X'Y'Z'.

use xyz_cli::commands::convert::ConvertCli;

fn main() {
    std::process::exit(xyz_cli::launch::<ConvertCli>());
}
