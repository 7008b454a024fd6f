use buscall_kiosk::{ChannelOutcome, DirectoryStore, Transmitter};

use crate::cmd::SendArgs;
use crate::exit::{kiosk_error, CliResult, SUCCESS, TRANSPORT_ERROR};
use crate::output::{print_report, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let config = args.transmit.transmitter_config()?;
    let store = DirectoryStore::new(&args.transmit.image_dir);
    let transmitter = Transmitter::udp(store, &args.transmit.endpoints(), config)
        .map_err(|err| kiosk_error("transmitter setup failed", err))?;

    let report = transmitter.transmit();
    print_report(&report, format);

    Ok(exit_code(&report.text))
}

/// A missing image is not an error; a message the network refused is.
fn exit_code(text: &ChannelOutcome) -> i32 {
    match text {
        ChannelOutcome::Failed { .. } => TRANSPORT_ERROR,
        _ => SUCCESS,
    }
}
