extern crate calgrid as lib;

use flexi_logger::{FileSpec, Logger};
use lib::command::Command;
use lib::config::TodayPolicy;
use lib::events::{Dispatcher, Event};
use lib::ui::{MonthPane, Theme};
use lib::widget::Widget;
use std::io::{stdout, Write};
use std::path::PathBuf;
use std::time::Duration;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "calgrid",
    author = "Julian Bigge <j.reedts@gmail.com>",
    about = "calgrid - A month calendar with day selection."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(
        short = "d",
        long = "date",
        help = "date (YYYY-MM-DD) whose month is shown first"
    )]
    pub date: Option<String>,

    #[structopt(
        short = "s",
        long = "show",
        help = "only show calendar non-interactively"
    )]
    pub show: bool,

    #[structopt(long = "plain", help = "do not use terminal styles")]
    pub plain: bool,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

const REFRESH_RATE: Duration = Duration::from_secs(60);

fn draw(widget: &Widget, theme: &Theme) -> std::io::Result<()> {
    let mut out = stdout();
    write!(out, "{}", MonthPane::new(&widget.render(), theme))?;
    out.flush()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &'static str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    logger.start()?;

    std::panic::set_hook(Box::new(move |info| {
        println!("calgrid ran into a fatal error!");
        println!(
            "Consider filing an issue with a log file and the backtrace below at {}",
            env!("CARGO_PKG_REPOSITORY")
        );

        println!("{}", info);
        println!("{:?}", backtrace::Backtrace::new());
    }));

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;

    let theme = Theme {
        styled: !args.plain,
        ..Theme::default()
    };

    let mut widget = Widget::new(args.date.as_deref(), &config);

    if args.show {
        return Ok(draw(&widget, &theme)?);
    }

    let tick_rate = match config.today {
        TodayPolicy::Refresh => Some(REFRESH_RATE),
        TodayPolicy::Fixed => None,
    };
    let dispatcher = Dispatcher::new(tick_rate);
    widget.subscribe(dispatcher.event_sink().clone());

    draw(&widget, &theme)?;

    loop {
        match dispatcher.next()? {
            Event::Input(cmd) => match cmd {
                Command::Next(n) | Command::Prev(n) => match cmd.month_delta() {
                    Some(delta) => widget.navigate_by(delta),
                    None => {
                        println!("Cannot move {} months", n);
                        continue;
                    }
                },
                Command::Select(day) => {
                    if widget.select_day_num(day).is_none() {
                        println!("No day {} in {}", day, widget.current_month());
                    }
                }
                Command::Today => widget.go_to_today(),
                Command::Show => widget.show(),
                Command::Hide => widget.hide(),
                Command::Toggle => widget.toggle_visibility(),
                Command::Quit => break,
            },
            Event::InvalidInput(line) => {
                println!("Unknown command '{}'", line.trim());
                continue;
            }
            Event::DaySelected(date) => {
                println!("Selected {}", date.format("%A, %Y-%m-%d"));
                continue;
            }
            Event::Update => widget.update(),
            Event::Closed => break,
        }

        draw(&widget, &theme)?;
    }

    widget.destroy();

    Ok(())
}
