use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

use karel::bytecode::Compiler;
use karel::bytecode::disasm::print_program;
use karel::lang::action::Action;
use karel::lang::condition::Condition;
use karel::lang::node::Node;
use karel::runtime::{InterpreterConfig, RunState};
use karel::world::CellKind;
use karel::Session;

#[derive(Parser)]
#[command(name = "karel")]
#[command(about = "Run structured Karel programs on a grid world", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile and run a saved session
    Run {
        /// Session file (.json, or postcard binary otherwise)
        session: PathBuf,

        /// Print the status of every step
        #[arg(long)]
        trace: bool,

        /// Stop after this many steps
        #[arg(long)]
        max_steps: Option<usize>,
    },

    /// Show the compiled instructions of a session's program and macros
    Disasm {
        session: PathBuf,
    },

    /// Run a built-in example session
    Demo {
        /// Also write the example session to this path
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            session,
            trace,
            max_steps,
        } => {
            let mut sess = Session::load(&session)
                .with_context(|| format!("failed to load '{}'", session.display()))?;
            sess.set_config(InterpreterConfig { max_steps });
            run_session(&mut sess, trace)?;
        }

        Commands::Disasm { session } => {
            let sess = Session::load(&session)
                .with_context(|| format!("failed to load '{}'", session.display()))?;
            disasm_session(&sess)?;
        }

        Commands::Demo { save } => {
            let mut sess = demo_session()?;
            if let Some(path) = save {
                sess.save(&path)
                    .with_context(|| format!("failed to save '{}'", path.display()))?;
                println!("saved demo session to {}", path.display());
            }
            run_session(&mut sess, true)?;
        }
    }

    Ok(())
}

fn run_session(sess: &mut Session, trace: bool) -> anyhow::Result<()> {
    let count = sess.compile_program()?;
    println!("compiled {} instructions", count);

    if trace {
        loop {
            let report = sess.step()?;
            println!("{}", report.status);
            if !report.continues {
                break;
            }
        }
    } else {
        sess.run_to_completion()?;
        println!("{}", sess.last_status_message());
    }

    println!();
    print!("{}", sess.world());
    println!("agent {}", sess.agent());

    if sess.state() == RunState::Failed {
        bail!(
            "run failed at line {}",
            sess.current_source_line().unwrap_or_default()
        );
    }
    Ok(())
}

fn disasm_session(sess: &Session) -> anyhow::Result<()> {
    let compiler = Compiler::new(sess.macros());

    for (line, block) in sess.program().blocks.iter().enumerate() {
        println!("L{:<4}{}", line, block.label());
    }
    println!();

    let main = compiler.compile_program(sess.program())?;
    print_program("main", &main);

    for name in sess.macros().names() {
        let body = compiler.compile_macro(name, 0)?;
        print_program(name, &body);
    }
    Ok(())
}

/// Walk east collecting beepers until the wall, then turn around.
fn demo_session() -> anyhow::Result<Session> {
    let mut sess = Session::new(6, 3)?;
    sess.set_cell(2, 0, CellKind::Beepers(1))?;
    sess.set_cell(4, 0, CellKind::Beepers(2))?;
    sess.set_cell(5, 1, CellKind::Wall)?;

    sess.add_macro(
        "collect",
        vec![Node::if_else(
            Condition::BeepersPresent,
            vec![Node::action(Action::PickUp)],
            vec![],
        )],
    );
    sess.add_macro(
        "turn_around",
        vec![Node::repeat(2, vec![Node::action(Action::TurnLeft)])],
    );

    sess.push_block(Node::repeat(
        5,
        vec![Node::action(Action::Move), Node::call("collect")],
    ));
    sess.push_block(Node::call("turn_around"));
    sess.push_block(Node::action(Action::PutDown));
    Ok(sess)
}
