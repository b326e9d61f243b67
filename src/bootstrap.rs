//! The session bootstrap sequence.
//!
//! [`plan`] turns a [`Config`] and its [`TagTable`] into an ordered list of
//! [`Step`]s; [`Session::run`] hands them one by one to a [`Dispatcher`].
//! Awaited steps finish before the next step starts.  Detached steps are
//! started and forgotten.  The first failure stops the sequence and nothing
//! already applied is undone.

use crate::command::{CommandInvocation, ParseError};
use crate::config::Config;
use crate::tags::TagTable;
use crate::traits::Dispatcher;
use log::{debug, info};
use std::fmt;

/// Phase of the bootstrap a step belongs to, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Bindings,
    Tags,
    Appearance,
    Repeat,
    Rules,
    Daemons,
    DefaultLayout,
    LayoutGenerator,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Bindings => "bindings",
            Stage::Tags => "tags",
            Stage::Appearance => "appearance",
            Stage::Repeat => "repeat",
            Stage::Rules => "rules",
            Stage::Daemons => "daemons",
            Stage::DefaultLayout => "default-layout",
            Stage::LayoutGenerator => "layout-generator",
        };
        write!(f, "{}", name)
    }
}

/// Whether a step blocks the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launch {
    /// Wait for the process to exit.
    Await,
    /// Start it and move on.
    Detach,
}

/// One command of the bootstrap sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub stage: Stage,
    pub launch: Launch,
    pub command: CommandInvocation,
}

/// Possible errors from the bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// A configured command could not be turned into an argument vector.
    #[error("malformed {stage} command: {source}")]
    Malformed {
        stage: Stage,
        #[source]
        source: ParseError,
    },

    /// The dispatcher failed; the remaining steps were not run.
    #[error("{stage} step `{command}` failed: {message}")]
    Dispatch {
        stage: Stage,
        command: String,
        message: String,
    },
}

/// Counts of the commands a completed bootstrap issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub awaited: usize,
    pub detached: usize,
}

struct Planner {
    steps: Vec<Step>,
}

impl Planner {
    fn push(
        &mut self,
        stage: Stage,
        launch: Launch,
        command: Result<CommandInvocation, ParseError>,
    ) -> Result<(), BootstrapError> {
        let command = command.map_err(|source| BootstrapError::Malformed { stage, source })?;
        self.steps.push(Step {
            stage,
            launch,
            command,
        });
        Ok(())
    }
}

/// Build the full sequence.
///
/// Every command is rendered up front, so a malformed entry is reported
/// before anything has been dispatched.
pub fn plan(config: &Config, tags: &TagTable) -> Result<Vec<Step>, BootstrapError> {
    let ctl = config.river_ctl();
    let mut p = Planner { steps: Vec::new() };

    for binding in &config.bindings {
        p.push(Stage::Bindings, Launch::Await, ctl.map(binding))?;
    }
    for binding in tags.keybindings() {
        p.push(Stage::Tags, Launch::Await, ctl.map(&binding))?;
    }

    let a = &config.appearance;
    p.push(Stage::Appearance, Launch::Await, ctl.background_color(&a.background_color))?;
    p.push(
        Stage::Appearance,
        Launch::Await,
        ctl.border_color_focused(&a.border_color_focused),
    )?;
    p.push(
        Stage::Appearance,
        Launch::Await,
        ctl.border_color_unfocused(&a.border_color_unfocused),
    )?;

    p.push(
        Stage::Repeat,
        Launch::Await,
        ctl.set_repeat(config.repeat.rate, config.repeat.delay),
    )?;

    for rule in &config.rules {
        p.push(Stage::Rules, Launch::Await, ctl.rule_add(rule))?;
    }

    for daemon in &config.daemons {
        p.push(Stage::Daemons, Launch::Detach, CommandInvocation::parse(daemon))?;
    }

    p.push(
        Stage::DefaultLayout,
        Launch::Await,
        ctl.default_layout(&config.layout.generator),
    )?;
    p.push(
        Stage::LayoutGenerator,
        Launch::Detach,
        CommandInvocation::parse(&config.layout.command),
    )?;

    Ok(p.steps)
}

/// Drives a planned sequence through a [`Dispatcher`].
///
/// The session is generic over the dispatcher, so the same sequence can be
/// executed for real, printed, or recorded in tests.
pub struct Session<D: Dispatcher> {
    dispatcher: D,
}

impl<D: Dispatcher> Session<D> {
    pub fn new(dispatcher: D) -> Self {
        Self { dispatcher }
    }

    /// Run `steps` in order, stopping at the first failure.
    pub fn run(&mut self, steps: &[Step]) -> Result<BootstrapReport, BootstrapError> {
        let mut report = BootstrapReport::default();
        let mut stage = None;

        for step in steps {
            if stage != Some(step.stage) {
                info!("{}", step.stage);
                stage = Some(step.stage);
            }
            let result = match step.launch {
                Launch::Await => self.dispatcher.run(&step.command).map(|out| {
                    if !out.trim().is_empty() {
                        debug!("{} printed: {}", step.command.program(), out.trim_end());
                    }
                    report.awaited += 1;
                }),
                Launch::Detach => self
                    .dispatcher
                    .spawn(&step.command)
                    .map(|()| report.detached += 1),
            };
            result.map_err(|e| BootstrapError::Dispatch {
                stage: step.stage,
                command: step.command.to_string(),
                message: e.to_string(),
            })?;
        }

        info!(
            "session configured: {} awaited, {} detached",
            report.awaited, report.detached
        );
        Ok(report)
    }

    /// Give back the dispatcher.
    pub fn into_inner(self) -> D {
        self.dispatcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::tags::{TagDefinition, TagMask};

    //  Recording dispatcher

    #[derive(Debug, Default)]
    struct Recorder {
        log: Vec<(Launch, String)>,
        fail_at: Option<usize>,
        attempts: usize,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("simulated spawn failure")]
    struct SpawnFailure;

    impl Recorder {
        fn failing_at(index: usize) -> Self {
            Self {
                fail_at: Some(index),
                ..Default::default()
            }
        }

        fn record(&mut self, launch: Launch, cmd: &CommandInvocation) -> Result<(), SpawnFailure> {
            let attempt = self.attempts;
            self.attempts += 1;
            if self.fail_at == Some(attempt) {
                return Err(SpawnFailure);
            }
            self.log.push((launch, cmd.to_string()));
            Ok(())
        }

        fn lines(&self) -> Vec<&str> {
            self.log.iter().map(|(_, s)| s.as_str()).collect()
        }
    }

    impl Dispatcher for Recorder {
        type Error = SpawnFailure;

        fn run(&mut self, cmd: &CommandInvocation) -> Result<String, SpawnFailure> {
            self.record(Launch::Await, cmd)?;
            Ok(String::new())
        }

        fn spawn(&mut self, cmd: &CommandInvocation) -> Result<(), SpawnFailure> {
            self.record(Launch::Detach, cmd)
        }
    }

    fn one_tag() -> TagTable {
        TagTable::new(vec![TagDefinition::new(
            "1:WWW",
            "1",
            TagMask::new(1).unwrap(),
            &[],
        )])
        .unwrap()
    }

    fn bare_config() -> Config {
        Config {
            bindings: Vec::new(),
            ..Config::default()
        }
    }

    const TAIL: [&str; 9] = [
        "riverctl background-color 0x002b36",
        "riverctl border-color-focused 0x93a1a1",
        "riverctl border-color-unfocused 0x586e75",
        "riverctl set-repeat 50 300",
        "riverctl rule-add -app-id float* -title foo float",
        "riverctl rule-add -app-id bar csd",
        "mako",
        "waybar",
        "riverctl default-layout rivertile",
    ];

    #[test]
    fn single_tag_scenario() {
        let steps = plan(&bare_config(), &one_tag()).unwrap();
        let mut session = Session::new(Recorder::default());
        session.run(&steps).unwrap();
        let rec = session.into_inner();

        let lines = rec.lines();
        assert_eq!(
            &lines[..4],
            [
                "riverctl map normal Super 1 set-focused-tags 1",
                "riverctl map normal Super+Control 1 set-view-tags 1",
                "riverctl map normal Super+Alt 1 toggle-focused-tags 1",
                "riverctl map normal Super+Control+Alt 1 toggle-view-tags 1",
            ]
        );
        assert_eq!(&lines[4..13], TAIL);
        assert_eq!(lines[13], "rivertile -view-padding 1 -outer-padding 0");
        assert_eq!(lines.len(), 14);
    }

    #[test]
    fn empty_table_still_runs_static_steps_in_order() {
        let tags = TagTable::new(Vec::new()).unwrap();
        let config = Config::default();
        let steps = plan(&config, &tags).unwrap();
        assert!(steps.iter().all(|s| s.stage != Stage::Tags));

        let mut session = Session::new(Recorder::default());
        let report = session.run(&steps).unwrap();
        let rec = session.into_inner();
        let lines = rec.lines();

        let n = config.bindings.len();
        assert_eq!(lines[0], "riverctl map normal Super Return spawn alacritty");
        assert_eq!(&lines[n..n + 9], TAIL);
        assert_eq!(lines.len(), n + 10);
        assert_eq!(report, BootstrapReport { awaited: n + 7, detached: 3 });
    }

    #[test]
    fn stages_are_in_order() {
        let steps = plan(&Config::default(), &TagTable::default()).unwrap();
        assert!(steps.windows(2).all(|w| w[0].stage <= w[1].stage));
        assert_eq!(steps.first().map(|s| s.stage), Some(Stage::Bindings));
        assert_eq!(steps.last().map(|s| s.stage), Some(Stage::LayoutGenerator));
    }

    #[test]
    fn default_session_issues_four_commands_per_tag() {
        let tags = TagTable::default();
        let steps = plan(&Config::default(), &tags).unwrap();
        let tag_steps: Vec<&Step> = steps.iter().filter(|s| s.stage == Stage::Tags).collect();
        assert_eq!(tag_steps.len(), 4 * tags.len());
        assert!(tag_steps.iter().all(|s| s.launch == Launch::Await));

        for (tag, chunk) in tags.tags().iter().zip(tag_steps.chunks(4)) {
            for step in chunk {
                let args = step.command.args();
                assert_eq!(args[3], tag.key);
                assert_eq!(args[5], tag.mask.to_string());
            }
        }
    }

    #[test]
    fn only_daemons_and_layout_generator_are_detached() {
        let steps = plan(&Config::default(), &TagTable::default()).unwrap();
        let detached: Vec<String> = steps
            .iter()
            .filter(|s| s.launch == Launch::Detach)
            .map(|s| s.command.to_string())
            .collect();
        assert_eq!(
            detached,
            ["mako", "waybar", "rivertile -view-padding 1 -outer-padding 0"]
        );
    }

    #[test]
    fn awaited_failure_stops_everything_after_it() {
        let steps = plan(&bare_config(), &one_tag()).unwrap();
        let mut session = Session::new(Recorder::failing_at(2));
        let err = session.run(&steps).unwrap_err();
        let rec = session.into_inner();

        assert_eq!(rec.attempts, 3);
        assert_eq!(rec.log.len(), 2);
        match err {
            BootstrapError::Dispatch { stage, command, message } => {
                assert_eq!(stage, Stage::Tags);
                assert_eq!(command, "riverctl map normal Super+Alt 1 toggle-focused-tags 1");
                assert_eq!(message, "simulated spawn failure");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn failure_on_every_awaited_step_stops_the_rest() {
        let steps = plan(&bare_config(), &one_tag()).unwrap();
        for (i, step) in steps.iter().enumerate() {
            if step.launch != Launch::Await {
                continue;
            }
            let mut session = Session::new(Recorder::failing_at(i));
            assert!(session.run(&steps).is_err());
            let rec = session.into_inner();
            assert_eq!(rec.attempts, i + 1);
            assert_eq!(rec.log.len(), i);
        }
    }

    #[test]
    fn malformed_layout_command_is_reported_before_dispatch() {
        let config = Config {
            layout: LayoutConfig {
                command: "rivertile \"-view-padding".into(),
                ..LayoutConfig::default()
            },
            ..bare_config()
        };
        let err = plan(&config, &one_tag()).unwrap_err();
        assert!(matches!(
            err,
            BootstrapError::Malformed {
                stage: Stage::LayoutGenerator,
                ..
            }
        ));
    }

    #[test]
    fn empty_daemon_entry_is_malformed() {
        let config = Config {
            daemons: vec!["mako".into(), "  ".into()],
            ..bare_config()
        };
        assert!(matches!(
            plan(&config, &one_tag()),
            Err(BootstrapError::Malformed {
                stage: Stage::Daemons,
                source: ParseError::Empty
            })
        ));
    }

    #[test]
    fn configured_control_program_is_used() {
        let config = Config {
            control: "riverctl-wrapper".into(),
            ..bare_config()
        };
        let steps = plan(&config, &one_tag()).unwrap();
        assert!(steps
            .iter()
            .filter(|s| s.launch == Launch::Await)
            .all(|s| s.command.program() == "riverctl-wrapper"));
    }
}
