//! Send one DCC command to a serial-attached command station.
//!
//! ```bash
//! dcc-send [--config FILE] [--port PATH] [--ascii] <command> [args...]
//!
//! dcc-send reset
//! dcc-send --port /dev/ttyUSB0 speed 3 20 forward 28
//! dcc-send function 3 0 on
//! dcc-send accessory 42 1
//! ```
//!
//! Set `RUST_LOG=debug` to see every frame as it is written.

use std::{env, fs, process};

use anyhow::{anyhow, bail, Context};
use log::info;
use rs_dcc::{
    hal::{IoTransport, StdDelay},
    Accessory, Broadcast, CommandStation, Config, Direction, Loco, SpeedStepMode, State,
    WireFormat,
};

const USAGE: &str = "\
usage: dcc-send [--config FILE] [--port PATH] [--ascii] <command>

commands:
  reset | idle | stop
  speed <addr> <speed> <forward|reverse> [14|28|128]
  estop <addr> [14|28|128]
  function <addr> <0-12> <on|off>
  accessory <addr> <0-7|on|off>";

/// What to put on the track.
#[derive(Debug, PartialEq)]
enum Command {
    Broadcast(Broadcast),
    Speed {
        address: u16,
        speed: i16,
        direction: Direction,
        mode: SpeedStepMode,
    },
    EmergencyStop {
        address: u16,
        mode: SpeedStepMode,
    },
    Function {
        address: u16,
        index: usize,
        on: bool,
    },
    Accessory {
        address: u16,
        state: State,
    },
}

/// Parsed command line.
#[derive(Debug)]
struct CmdLine {
    config_file: Option<String>,
    port: Option<String>,
    ascii: bool,
    command: Command,
}

fn parse_number<T: core::str::FromStr>(what: &str, arg: Option<String>) -> anyhow::Result<T> {
    let arg = arg.ok_or_else(|| anyhow!("missing {}", what))?;
    arg.trim()
        .parse()
        .map_err(|_| anyhow!("invalid {}: {}", what, arg))
}

fn parse_mode(arg: Option<String>) -> anyhow::Result<SpeedStepMode> {
    match arg {
        None => Ok(SpeedStepMode::default()),
        Some(s) => s
            .trim()
            .parse()
            .ok()
            .and_then(SpeedStepMode::from_steps)
            .ok_or_else(|| anyhow!("invalid speed steps: {}", s)),
    }
}

fn parse_on_off(arg: &str) -> Option<bool> {
    match arg.trim().to_ascii_lowercase().as_str() {
        "on" | "1" | "true" => Some(true),
        "off" | "0" | "false" => Some(false),
        _ => None,
    }
}

fn parse_command(name: &str, mut args: impl Iterator<Item = String>) -> anyhow::Result<Command> {
    let command = if let Some(kind) = Broadcast::from_text(name) {
        Command::Broadcast(kind)
    } else {
        match name {
            "speed" => Command::Speed {
                address: parse_number("address", args.next())?,
                speed: parse_number("speed", args.next())?,
                direction: {
                    let d = args.next().ok_or_else(|| anyhow!("missing direction"))?;
                    Direction::from_text(&d).ok_or_else(|| anyhow!("invalid direction: {}", d))?
                },
                mode: parse_mode(args.next())?,
            },
            "estop" => Command::EmergencyStop {
                address: parse_number("address", args.next())?,
                mode: parse_mode(args.next())?,
            },
            "function" => Command::Function {
                address: parse_number("address", args.next())?,
                index: parse_number("function index", args.next())?,
                on: {
                    let s = args.next().ok_or_else(|| anyhow!("missing on/off"))?;
                    parse_on_off(&s).ok_or_else(|| anyhow!("expected on or off, got {}", s))?
                },
            },
            "accessory" => {
                let address = parse_number("address", args.next())?;
                let s = args.next().ok_or_else(|| anyhow!("missing accessory state"))?;
                let state = match s.trim() {
                    "on" => State::Binary(true),
                    "off" => State::Binary(false),
                    other => State::Named(
                        other
                            .parse()
                            .map_err(|_| anyhow!("invalid accessory state: {}", s))?,
                    ),
                };
                Command::Accessory { address, state }
            }
            other => bail!("unknown command: {}", other),
        }
    };
    if let Some(extra) = args.next() {
        bail!("unexpected argument: {}", extra);
    }
    Ok(command)
}

fn parse_cmd_line(mut args: impl Iterator<Item = String>) -> anyhow::Result<CmdLine> {
    // arg[0] is our own path
    args.next();
    let mut config_file = None;
    let mut port = None;
    let mut ascii = false;
    loop {
        let arg = args.next().ok_or_else(|| anyhow!("missing command"))?;
        match arg.as_str() {
            "--config" | "-c" => {
                config_file = Some(args.next().ok_or_else(|| anyhow!("--config needs a file"))?)
            }
            "--port" | "-p" => port = Some(args.next().ok_or_else(|| anyhow!("--port needs a path"))?),
            "--ascii" => ascii = true,
            "--help" | "-h" | "-?" => bail!("help requested"),
            name => {
                let command = parse_command(name, args)?;
                return Ok(CmdLine {
                    config_file,
                    port,
                    ascii,
                    command,
                });
            }
        }
    }
}

fn load_config(cmd_line: &CmdLine) -> anyhow::Result<Config> {
    let mut config = match &cmd_line.config_file {
        Some(path) => {
            let json = fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
            Config::from_json(&json).map_err(|e| anyhow!("invalid config {}: {:?}", path, e))?
        }
        None => Config::default(),
    };
    if let Some(port) = &cmd_line.port {
        config.transport = config.transport.with_port(port);
    }
    if cmd_line.ascii {
        config.station = config.station.with_wire_format(WireFormat::AsciiBits);
    }
    Ok(config)
}

fn run(cmd_line: CmdLine) -> anyhow::Result<()> {
    let config = load_config(&cmd_line)?;
    let port = config.transport.port.as_str();
    let transport = IoTransport::open(port).with_context(|| format!("opening {}", port))?;
    info!("opened {} ({:?})", port, config.station.wire_format);

    let mut station = CommandStation::new(transport, StdDelay, config.station);
    match cmd_line.command {
        Command::Broadcast(kind) => station.broadcast(kind)?,
        Command::Speed {
            address,
            speed,
            direction,
            mode,
        } => {
            let mut loco = Loco::new(address, mode)?;
            station.set_speed(&mut loco, speed, direction)?;
        }
        Command::EmergencyStop { address, mode } => {
            let mut loco = Loco::new(address, mode)?;
            station.emergency_stop(&mut loco)?;
        }
        Command::Function { address, index, on } => {
            let mut loco = Loco::new(address, SpeedStepMode::default())?;
            station.set_function(&mut loco, index, on)?;
        }
        Command::Accessory { address, state } => {
            let mut accessory = Accessory::new(address)?;
            station.set_accessory(&mut accessory, state)?;
        }
    }
    station.close()?;
    Ok(())
}

fn main() {
    env_logger::init();

    let cmd_line = match parse_cmd_line(env::args()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            process::exit(2);
        }
    };
    if let Err(e) = run(cmd_line) {
        eprintln!("dcc-send: {:#}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> impl Iterator<Item = String> + '_ {
        core::iter::once("dcc-send".to_string()).chain(line.split_whitespace().map(String::from))
    }

    #[test]
    fn parses_broadcasts() {
        let c = parse_cmd_line(args("reset")).unwrap();
        assert_eq!(c.command, Command::Broadcast(Broadcast::Reset));
        let c = parse_cmd_line(args("stop")).unwrap();
        assert_eq!(c.command, Command::Broadcast(Broadcast::StopAll));
    }

    #[test]
    fn parses_speed_with_options() {
        let c = parse_cmd_line(args("--port COM5 --ascii speed 3 20 rev 28")).unwrap();
        assert_eq!(c.port.as_deref(), Some("COM5"));
        assert!(c.ascii);
        assert_eq!(
            c.command,
            Command::Speed {
                address: 3,
                speed: 20,
                direction: Direction::Reverse,
                mode: SpeedStepMode::Steps28,
            }
        );
    }

    #[test]
    fn speed_mode_defaults_to_128() {
        let c = parse_cmd_line(args("estop 7")).unwrap();
        assert_eq!(
            c.command,
            Command::EmergencyStop {
                address: 7,
                mode: SpeedStepMode::Steps128,
            }
        );
    }

    #[test]
    fn parses_function_and_accessory() {
        let c = parse_cmd_line(args("function 3 4 on")).unwrap();
        assert_eq!(
            c.command,
            Command::Function {
                address: 3,
                index: 4,
                on: true,
            }
        );
        let c = parse_cmd_line(args("accessory 42 5")).unwrap();
        assert_eq!(
            c.command,
            Command::Accessory {
                address: 42,
                state: State::Named(5),
            }
        );
        let c = parse_cmd_line(args("accessory 42 off")).unwrap();
        assert_eq!(
            c.command,
            Command::Accessory {
                address: 42,
                state: State::Binary(false),
            }
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_cmd_line(args("")).is_err());
        assert!(parse_cmd_line(args("fly 3")).is_err());
        assert!(parse_cmd_line(args("speed 3 20 sideways")).is_err());
        assert!(parse_cmd_line(args("speed 3 20 fwd 64")).is_err());
        assert!(parse_cmd_line(args("function 3 4 maybe")).is_err());
        assert!(parse_cmd_line(args("reset now")).is_err());
        assert!(parse_cmd_line(args("--config")).is_err());
    }
}
