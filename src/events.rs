use chrono::NaiveDate;
use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::command::Command;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Input(Command),
    InvalidInput(String),
    DaySelected(NaiveDate),
    Update,
    Closed,
}

pub struct Dispatcher {
    rx: mpsc::Receiver<Event>,
    tx: mpsc::Sender<Event>,
    _input_handle: thread::JoinHandle<()>,
    _update_handle: Option<thread::JoinHandle<()>>,
}

impl Dispatcher {
    /// Spawns a thread reading commands from stdin, and if `tick_rate` is
    /// given, one emitting `Event::Update` at that rate.
    pub fn new(tick_rate: Option<Duration>) -> Dispatcher {
        let (tx, rx) = mpsc::channel();
        let input_handle = {
            let tx = tx.clone();
            thread::spawn(move || {
                let stdin = io::stdin();
                for line in stdin.lock().lines() {
                    let evt = match line {
                        Ok(line) if line.trim().is_empty() => continue,
                        Ok(line) => match line.parse::<Command>() {
                            Ok(cmd) => Event::Input(cmd),
                            Err(_) => Event::InvalidInput(line),
                        },
                        Err(e) => {
                            log::warn!("Error while reading input: {}", e);
                            break;
                        }
                    };

                    if tx.send(evt).is_err() {
                        return;
                    }
                }
                let _ = tx.send(Event::Closed);
            })
        };

        let update_handle = tick_rate.map(|tick_rate| {
            let tx_upd = tx.clone();
            thread::spawn(move || loop {
                if tx_upd.send(Event::Update).is_err() {
                    return;
                }
                thread::sleep(tick_rate);
            })
        });

        Dispatcher {
            rx,
            tx,
            _input_handle: input_handle,
            _update_handle: update_handle,
        }
    }

    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }

    pub fn event_sink(&self) -> &mpsc::Sender<Event> {
        &self.tx
    }
}
