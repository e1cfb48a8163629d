//! uroflow main entrypoint.

use uroflow::run;
use uroflow::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {e}"));
        std::process::exit(e.exit_code());
    }
}
