//! TCP adapter for the simulator port
//!
//! Speaks the line-oriented text protocol: one `verb argument` request
//! per line, one complete reply line per request. Every call blocks
//! until the reply arrives; a read timeout turns a silent server into
//! an [`Error::Transport`] instead of a hang.

use std::{
    io::{BufRead, BufReader, Write},
    net::TcpStream,
    time::Duration,
};

use crate::{
    adapters::wire,
    ports::Simulator,
    types::{Direction, Position},
    Error, Result,
};

/// How directional moves are realized on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveMode {
    /// Issue `command north|south|east|west` directly.
    Direct,
    /// Query the agent's facing and realize the move with the
    /// `left`/`right`/`forward` primitives, for simulators without a
    /// grid-direction command API.
    TurnAndStep,
}

/// Simulator connection over TCP.
pub struct TcpSimulator {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    drive_mode: DriveMode,
}

impl TcpSimulator {
    /// Connect to the simulator at `addr` (e.g. `127.0.0.1:50001`).
    ///
    /// `reply_timeout` bounds how long each request may wait for its
    /// reply; `None` waits indefinitely.
    pub fn connect(addr: &str, reply_timeout: Option<Duration>, drive_mode: DriveMode) -> Result<Self> {
        let stream = TcpStream::connect(addr).map_err(|source| Error::Connection {
            addr: addr.to_string(),
            source,
        })?;
        stream
            .set_read_timeout(reply_timeout)
            .map_err(|source| Error::Connection {
                addr: addr.to_string(),
                source,
            })?;
        let writer = stream.try_clone().map_err(|source| Error::Connection {
            addr: addr.to_string(),
            source,
        })?;
        Ok(Self {
            reader: BufReader::new(stream),
            writer,
            drive_mode,
        })
    }

    /// Issue one request and read back its reply line.
    fn execute(&mut self, verb: &str, argument: &str) -> Result<String> {
        let request = format!("{verb} {argument}");
        writeln!(self.writer, "{request}").map_err(|source| Error::Transport {
            request: request.clone(),
            source,
        })?;
        self.writer.flush().map_err(|source| Error::Transport {
            request: request.clone(),
            source,
        })?;

        let mut reply = String::new();
        let bytes = self
            .reader
            .read_line(&mut reply)
            .map_err(|source| Error::Transport {
                request: request.clone(),
                source,
            })?;
        if bytes == 0 {
            return Err(Error::Transport {
                request,
                source: std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "connection closed by simulator",
                ),
            });
        }
        Ok(reply.trim().to_string())
    }

    fn query_pair(&mut self, argument: &str) -> Result<Position> {
        let reply = self.execute("info", argument)?;
        let (x, y) = wire::parse_pair(&reply).map_err(|message| Error::ReplyParse {
            request: format!("info {argument}"),
            message,
        })?;
        if x < 0 || y < 0 {
            return Err(Error::ReplyParse {
                request: format!("info {argument}"),
                message: format!("negative coordinates ({x}, {y})"),
            });
        }
        Ok(Position::new(x as usize, y as usize))
    }

    /// The direction the agent currently faces.
    fn facing(&mut self) -> Result<Direction> {
        let reply = self.execute("info", "direction")?;
        reply.parse().map_err(|_| Error::ReplyParse {
            request: "info direction".to_string(),
            message: format!("unrecognized direction '{reply}'"),
        })
    }

    /// Realize a directional move with turn/step primitives.
    fn turn_and_step(&mut self, direction: Direction) -> Result<()> {
        let facing = self.facing()?;
        if facing == direction.opposite() {
            self.execute("command", "right")?;
            self.execute("command", "right")?;
        } else if clockwise(facing) == direction {
            self.execute("command", "right")?;
        } else if clockwise(direction) == facing {
            self.execute("command", "left")?;
        }
        self.execute("command", "forward")?;
        Ok(())
    }
}

/// One quarter turn to the right: north, east, south, west, north.
fn clockwise(direction: Direction) -> Direction {
    match direction {
        Direction::North => Direction::East,
        Direction::East => Direction::South,
        Direction::South => Direction::West,
        Direction::West => Direction::North,
    }
}

impl Simulator for TcpSimulator {
    fn position(&mut self) -> Result<Position> {
        self.query_pair("position")
    }

    fn goal(&mut self) -> Result<Position> {
        self.query_pair("goal")
    }

    fn extents(&mut self) -> Result<(usize, usize)> {
        let reply = self.execute("info", "maxcoord")?;
        let (width, height) = wire::parse_pair(&reply).map_err(|message| Error::ReplyParse {
            request: "info maxcoord".to_string(),
            message,
        })?;
        if width <= 0 || height <= 0 {
            return Err(Error::EmptyWorld { width, height });
        }
        Ok((width as usize, height as usize))
    }

    fn obstacles(&mut self) -> Result<Vec<Vec<bool>>> {
        let reply = self.execute("info", "obstacles")?;
        wire::parse_bool_grid(&reply).map_err(|message| Error::ReplyParse {
            request: "info obstacles".to_string(),
            message,
        })
    }

    fn rewards(&mut self) -> Result<Vec<Vec<f64>>> {
        let reply = self.execute("info", "rewards")?;
        wire::parse_number_grid(&reply).map_err(|message| Error::ReplyParse {
            request: "info rewards".to_string(),
            message,
        })
    }

    fn targets(&mut self) -> Result<Vec<Vec<bool>>> {
        let reply = self.execute("info", "targets")?;
        wire::parse_bool_grid(&reply).map_err(|message| Error::ReplyParse {
            request: "info targets".to_string(),
            message,
        })
    }

    fn move_toward(&mut self, direction: Direction) -> Result<()> {
        match self.drive_mode {
            DriveMode::Direct => {
                self.execute("command", direction.as_str())?;
                Ok(())
            }
            DriveMode::TurnAndStep => self.turn_and_step(direction),
        }
    }

    fn go_home(&mut self) -> Result<()> {
        self.execute("command", "home")?;
        Ok(())
    }

    fn mark(&mut self, pos: Position, color: &str) -> Result<()> {
        self.execute("mark", &format!("{},{}_{}", pos.x, pos.y, color))?;
        Ok(())
    }

    fn unmark(&mut self, pos: Position) -> Result<()> {
        self.execute("unmark", &format!("{},{}", pos.x, pos.y))?;
        Ok(())
    }

    fn place_arrow(&mut self, direction: Direction, pos: Position) -> Result<()> {
        // The wire argument is "<direction>,<row>,<column>" with the
        // glyph landing at (column, row).
        self.execute("marrow", &format!("{},{},{}", direction, pos.y, pos.x))?;
        Ok(())
    }
}
