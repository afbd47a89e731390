mod cli;

use cuecraft_lib::core::CoreError;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("error: {:#}", e); // full anyhow chain
        let internal = e
            .chain()
            .any(|cause| cause.downcast_ref::<CoreError>().is_some_and(CoreError::is_internal));
        if internal {
            eprintln!("note: this is a cuecraft bug, not a problem with the input file");
        }
        std::process::exit(1);
    }
}
