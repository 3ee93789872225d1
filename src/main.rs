use toolsuite::commands::builtin_registry;
use toolsuite::display::{Diagnostics, LastResort};
use toolsuite::Dispatcher;

fn main() {
    let dispatcher = Dispatcher::new(builtin_registry());

    if let Err(e) = dispatcher.interrupt_flag().install_handler() {
        LastResort.warning(&format!("cannot install interrupt handler: {}", e));
    }

    let code = dispatcher.main(std::env::args_os());
    std::process::exit(code);
}
