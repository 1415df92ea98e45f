use std::io::{self, BufRead, Write};

use recall_core::prelude::*;
use recall_hooks::{DefaultState, use_default};

#[derive(Clone, PartialEq, Debug)]
struct User {
    name: String,
}

struct Ui {
    card: String,
    count: Signal<i32>,
    user: DefaultState<User>,
}

fn app() -> Ui {
    let count = remember(|| signal(0i32));
    let user = use_default(
        User {
            name: "initial".into(),
        },
        User {
            name: "Jane Doe".into(),
        },
    );

    let card = format!(
        "┌─ user card ───────────────\n│ count: {}\n│ name:  {}\n└───────────────────────────",
        count.get(),
        user.get().name
    );

    Ui {
        card,
        count: (*count).clone(),
        user,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut host = Host::new();
    let stdin = io::stdin();

    println!("commands: +  none  john  jane  bob  q");
    loop {
        let ui = host.frame(app);
        println!("{}", ui.card);
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match line.trim() {
            "+" => ui.count.update(|c| *c += 1),
            "none" => ui.user.set(None),
            "john" => ui.user.set(Some(User {
                name: "John Doe".into(),
            })),
            "jane" => ui.user.set(Some(User {
                name: "Jane Doe".into(),
            })),
            "bob" => ui.user.set(Some(User { name: "Bob".into() })),
            "q" => break,
            "" => {}
            other => println!("unknown command: {other}"),
        }
    }

    Ok(())
}
