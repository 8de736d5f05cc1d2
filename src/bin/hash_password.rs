//! Prints an argon2 hash for `AUTH_PASSWORD_HASH`.
//!
//! Usage: `hash-password <password>` or pipe the password on stdin.

use std::io::{self, BufRead};

use expense_tracker_api::auth::hash_password;

fn main() {
    let password = match std::env::args().nth(1) {
        Some(password) => password,
        None => {
            let mut line = String::new();
            io::stdin()
                .lock()
                .read_line(&mut line)
                .expect("failed to read password from stdin");
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    if password.is_empty() {
        eprintln!("usage: hash-password <password>");
        std::process::exit(2);
    }

    match hash_password(&password) {
        Ok(hash) => println!("{hash}"),
        Err(error) => {
            eprintln!("failed to hash password: {error}");
            std::process::exit(1);
        }
    }
}
