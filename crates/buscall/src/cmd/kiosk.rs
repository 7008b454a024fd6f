use buscall_kiosk::{ButtonMonitor, DirectoryStore, MonitorConfig, SysfsInput, Transmitter};
use tracing::info;

use crate::cmd::{install_ctrlc_handler, KioskArgs};
use crate::exit::{kiosk_error, CliResult, SUCCESS};
use crate::output::{print_report, OutputFormat};

pub fn run(args: KioskArgs, format: OutputFormat) -> CliResult<i32> {
    let config = args.transmit.transmitter_config()?;
    let store = DirectoryStore::new(&args.transmit.image_dir);
    let transmitter = Transmitter::udp(store, &args.transmit.endpoints(), config)
        .map_err(|err| kiosk_error("transmitter setup failed", err))?;

    let running = install_ctrlc_handler()?;

    let input = SysfsInput::with_root(&args.gpio_root, args.gpio_pin);
    let monitor_config = MonitorConfig {
        poll_interval: args.poll_interval,
        debounce: args.debounce,
    };
    let trigger = || {
        let report = transmitter.transmit();
        print_report(&report, format);
    };
    let mut monitor = ButtonMonitor::new(input, trigger, monitor_config);

    let presses = monitor
        .run(&running)
        .map_err(|err| kiosk_error("button input failed", err))?;

    info!(presses, "kiosk stopped");
    Ok(SUCCESS)
}
