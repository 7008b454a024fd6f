use std::ops::ControlFlow;

use buscall_depot::{Receiver, ReceiverConfig};
use buscall_payload::EndpointConfig;
use tracing::info;

use crate::cmd::{install_ctrlc_handler, DepotArgs};
use crate::exit::{depot_error, CliResult, SUCCESS};
use crate::output::{print_event, OutputFormat};

pub fn run(args: DepotArgs, format: OutputFormat) -> CliResult<i32> {
    let endpoints = EndpointConfig::for_host(args.bind, args.ports.image_port, args.ports.text_port);
    let config = ReceiverConfig {
        artifact: args.output.clone(),
        idle_sleep: args.idle_sleep,
    };
    let mut receiver =
        Receiver::bind(&endpoints, config).map_err(|err| depot_error("bind failed", err))?;

    let running = install_ctrlc_handler()?;

    let mut printed = 0usize;
    let handled = receiver.run(&running, |event| {
        print_event(event, format);
        printed = printed.saturating_add(1);
        match args.count {
            Some(count) if printed >= count => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        }
    });

    info!(events = handled, "depot stopped");
    Ok(SUCCESS)
}
