//! Stock observers for learning runs
//!
//! Observers allow composable data collection during a run without
//! coupling the episode loop to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    engine::path::Transition,
    engine::runner::{EpisodeSummary, Terminal},
    ports::RunObserver,
    Result,
};

/// Progress bar observer - shows run progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    goals: usize,
    targets: usize,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            goals: 0,
            targets: 0,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl RunObserver for ProgressObserver {
    fn on_run_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, summary: &EpisodeSummary) -> Result<()> {
        match summary.terminal {
            Terminal::Goal => self.goals += 1,
            Terminal::Target => self.targets += 1,
        }
        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(format!("G:{} T:{}", self.goals, self.targets));
        }
        Ok(())
    }

    fn on_run_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!("G:{} T:{}", self.goals, self.targets));
        }
        Ok(())
    }
}

/// Metrics observer - tracks per-episode statistics
pub struct MetricsObserver {
    episodes: usize,
    goal_terminations: usize,
    target_terminations: usize,
    step_counts: Vec<usize>,
    value_updates: usize,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self {
            episodes: 0,
            goal_terminations: 0,
            target_terminations: 0,
            step_counts: Vec::new(),
            value_updates: 0,
        }
    }

    /// Fraction of episodes that ended on the goal tile
    pub fn goal_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.goal_terminations as f64 / self.episodes as f64
        }
    }

    /// Average number of moves per episode
    pub fn avg_episode_steps(&self) -> f64 {
        if self.step_counts.is_empty() {
            0.0
        } else {
            self.step_counts.iter().sum::<usize>() as f64 / self.step_counts.len() as f64
        }
    }

    pub fn value_updates(&self) -> usize {
        self.value_updates
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            episodes: self.episodes,
            goal_terminations: self.goal_terminations,
            target_terminations: self.target_terminations,
            goal_rate: self.goal_rate(),
            avg_episode_steps: self.avg_episode_steps(),
            value_updates: self.value_updates,
        }
    }
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of run metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub goal_terminations: usize,
    pub target_terminations: usize,
    pub goal_rate: f64,
    pub avg_episode_steps: f64,
    pub value_updates: usize,
}

impl RunObserver for MetricsObserver {
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        self.step_counts.push(0);
        Ok(())
    }

    fn on_step(&mut self, _episode: usize, _step: usize, _transition: &Transition) -> Result<()> {
        if let Some(last) = self.step_counts.last_mut() {
            *last += 1;
        }
        Ok(())
    }

    fn on_value_updated(
        &mut self,
        _state: crate::types::Position,
        _action: crate::types::Direction,
        _new_value: f64,
    ) -> Result<()> {
        self.value_updates += 1;
        Ok(())
    }

    fn on_episode_end(&mut self, _episode: usize, summary: &EpisodeSummary) -> Result<()> {
        self.episodes += 1;
        match summary.terminal {
            Terminal::Goal => self.goal_terminations += 1,
            Terminal::Target => self.target_terminations += 1,
        }
        Ok(())
    }
}

/// Observation of a single transition during an episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub episode: usize,
    pub step: usize,
    pub transition: Transition,
}

/// Complete record of one episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub episode: usize,
    pub terminal: Terminal,
    pub total_steps: usize,
    pub steps: Vec<StepRecord>,
}

/// JSONL trace observer - writes one episode record per line
pub struct JsonlTraceObserver {
    writer: BufWriter<File>,
    current_steps: Vec<StepRecord>,
}

impl JsonlTraceObserver {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            current_steps: Vec::new(),
        })
    }
}

impl RunObserver for JsonlTraceObserver {
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        self.current_steps.clear();
        Ok(())
    }

    fn on_step(&mut self, episode: usize, step: usize, transition: &Transition) -> Result<()> {
        self.current_steps.push(StepRecord {
            episode,
            step,
            transition: *transition,
        });
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, summary: &EpisodeSummary) -> Result<()> {
        let record = EpisodeRecord {
            episode,
            terminal: summary.terminal,
            total_steps: self.current_steps.len(),
            steps: std::mem::take(&mut self.current_steps),
        };
        serde_json::to_writer(&mut self.writer, &record)?;
        writeln!(&mut self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_observer_counts() {
        let mut observer = MetricsObserver::new();
        assert_eq!(observer.goal_rate(), 0.0);

        observer.on_episode_start(0).unwrap();
        observer
            .on_episode_end(
                0,
                &EpisodeSummary {
                    steps: 4,
                    terminal: Terminal::Goal,
                },
            )
            .unwrap();
        observer.on_episode_start(1).unwrap();
        observer
            .on_episode_end(
                1,
                &EpisodeSummary {
                    steps: 2,
                    terminal: Terminal::Target,
                },
            )
            .unwrap();

        let summary = observer.summary();
        assert_eq!(summary.episodes, 2);
        assert_eq!(summary.goal_terminations, 1);
        assert_eq!(summary.target_terminations, 1);
        assert!((summary.goal_rate - 0.5).abs() < 1e-12);
    }
}
