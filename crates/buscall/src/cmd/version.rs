use buscall_payload::{IMAGE_PORT, MAX_DATAGRAM_SIZE, TEXT_PORT};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("buscall {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: buscall");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "build_target: {}",
        option_env!("BUSCALL_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("git_hash: {}", option_env!("BUSCALL_GIT_HASH").unwrap_or("unknown"));
    println!("ports: image={IMAGE_PORT} text={TEXT_PORT}");
    println!("max_datagram: {MAX_DATAGRAM_SIZE}");
    println!(
        "features: kiosk={}, depot={}, cli=true",
        cfg!(feature = "kiosk"),
        cfg!(feature = "depot")
    );

    Ok(SUCCESS)
}
