mod term;

use std::{
    env,
    io::{self, BufRead},
    sync::Arc,
    thread,
};

use env_logger::{Builder, Env};
use reelbox_core::transport::HttpTransport;
use reelbox_ui::{
    data::{Params, Route, View},
    AppLauncher, Command, Config, ExtEventSink,
};

use crate::term::TerminalSurface;

const ENV_LOG: &str = "REELBOX_LOG";
const ENV_LOG_STYLE: &str = "REELBOX_LOG_STYLE";

const USAGE: &str = "commands: home | search <query> | open <id> | play [id] | quality <resolution> | close | back | quit";

fn main() {
    // Setup logging from the env variables, with defaults.
    Builder::from_env(
        Env::new()
            .filter_or(ENV_LOG, "info")
            .write_style(ENV_LOG_STYLE),
    )
    .init();

    let config = Config::load_or_init();
    let transport = Arc::new(HttpTransport::new(
        config.proxy().as_deref(),
        config.request_timeout(),
    ));
    let mut launcher = AppLauncher::new(config, transport, TerminalSurface::new(io::stdout()));

    let _input_thread = thread::spawn({
        let sink = launcher.sink();
        move || read_commands(io::stdin().lock(), &sink)
    });

    let deep_link = env::args().nth(1);
    launcher.open(deep_link.as_deref());
    launcher.run();
}

fn read_commands(input: impl BufRead, sink: &ExtEventSink) {
    eprintln!("{USAGE}");
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                log::error!("failed to read input: {err}");
                break;
            }
        };
        match parse_command(&line) {
            Ok(Some(command)) => {
                let quit = matches!(command, Command::Quit);
                if sink.submit_command(command).is_err() || quit {
                    return;
                }
            }
            Ok(None) => {}
            Err(message) => eprintln!("{message}"),
        }
    }
    // End of input.
    let _ = sink.submit_command(Command::Quit);
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let command = match (word, rest) {
        ("", _) => return Ok(None),
        ("home", _) => Command::Navigate(Route::home()),
        ("search", "") => return Err("usage: search <query>".into()),
        ("search", query) => Command::SubmitSearch(query.into()),
        ("open", "") => return Err("usage: open <id>".into()),
        ("open", id) => Command::Navigate(Route::details(id)),
        ("play", "") => Command::Navigate(Route::new(View::Player, Params::new())),
        ("play", id) => Command::Navigate(Route::player(id)),
        ("quality", resolution) => {
            let resolution = resolution
                .trim_end_matches(['p', 'P'])
                .parse()
                .map_err(|_| format!("not a resolution: {resolution:?}"))?;
            Command::SwitchQuality(resolution)
        }
        ("close", _) => Command::ClosePlayer,
        ("back", _) => Command::NavigateBack,
        ("quit" | "exit", _) => Command::Quit,
        (other, _) => return Err(format!("unknown command {other:?}, {USAGE}")),
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        parse_command(line).unwrap().unwrap()
    }

    #[test]
    fn search_keeps_whole_query() {
        match parse("search  the dark knight ") {
            Command::SubmitSearch(query) => assert_eq!(query.as_ref(), "the dark knight"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn play_without_id_uses_last_details() {
        match parse("play") {
            Command::Navigate(route) => {
                assert_eq!(route.view, View::Player);
                assert!(route.params.is_empty());
            }
            other => panic!("unexpected {other:?}"),
        }
        match parse("play 42") {
            Command::Navigate(route) => assert_eq!(route, Route::player("42")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn quality_accepts_suffix() {
        assert!(matches!(parse("quality 720p"), Command::SwitchQuality(720)));
        assert!(matches!(parse("quality 1080"), Command::SwitchQuality(1080)));
        assert!(parse_command("quality best").is_err());
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert!(parse_command("   ").unwrap().is_none());
        assert!(parse_command("dance").is_err());
        assert!(parse_command("open").is_err());
        assert!(matches!(parse("exit"), Command::Quit));
    }
}
