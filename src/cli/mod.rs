//! Interactive console playing the part of the browser context: one session
//! store, one credential cache on disk, every navigation run through the
//! guard. Commands mirror what the view layer would call.

mod output;

use std::sync::Arc;
use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::info;

use crate::data::MockUserRegistry;
use crate::identity::{evaluate_navigation, LoginRequest, Role, RouteDecision, SessionStore};
use crate::routes::{RouteTable, StaticRouteTable, ROOT_PATH};
use crate::storage::FileCache;

// Redirect chains are short (login -> default landing at most); anything
// longer means a miswired route table.
const MAX_REDIRECTS: usize = 8;

struct Console {
    store: SessionStore,
    table: StaticRouteTable,
    current_path: String,
}

pub fn run(data_dir: &str) -> Result<()> {
    let cache = Arc::new(FileCache::new(data_dir)?);
    let registry = Arc::new(MockUserRegistry::new());
    let store = SessionStore::new(registry, cache);

    // Same restore the front end performs once at app start
    if store.check_auth() {
        if let Some(role) = store.snapshot().active_role() {
            info!(target: "cityalert", "restored previous session, role={}", role);
        }
    }

    let mut console = Console {
        store,
        table: StaticRouteTable,
        current_path: ROOT_PATH.to_string(),
    };
    console.navigate(ROOT_PATH.to_string());

    let mut rl = DefaultEditor::new()?;
    loop {
        let prompt = format!("cityalert:{}> ", console.current_path);
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);
                if !console.dispatch(line) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

impl Console {
    /// Returns false when the console should exit.
    fn dispatch(&mut self, line: &str) -> bool {
        let mut parts = line.split_whitespace();
        let cmd = parts.next().unwrap_or("");
        let args: Vec<&str> = parts.collect();
        match cmd {
            "help" => print_help(),
            "login" => self.cmd_login(&args),
            "logout" => {
                self.store.logout();
                println!("logged out");
                self.navigate(ROOT_PATH.to_string());
            }
            "switch" => self.cmd_switch(&args),
            "clear" => self.cmd_clear(&args),
            "roles" => self.cmd_roles(),
            "whoami" => self.cmd_whoami(),
            "routes" => self.cmd_routes(),
            "go" => match args.first() {
                Some(path) => self.navigate((*path).to_string()),
                None => println!("usage: go <path>"),
            },
            "exit" | "quit" => return false,
            other => println!("unknown command '{}', try 'help'", other),
        }
        true
    }

    fn cmd_login(&mut self, args: &[&str]) {
        let (Some(username), Some(password), Some(role_raw)) =
            (args.first(), args.get(1), args.get(2))
        else {
            println!("usage: login <username> <password> <citizen|responder>");
            return;
        };
        let Some(role) = Role::parse(role_raw) else {
            println!("unknown role '{}', expected citizen or responder", role_raw);
            return;
        };
        let outcome = self.store.login(&LoginRequest::new(*username, *password, role));
        println!("{}", outcome.message);
        if outcome.success {
            let landing = self.table.default_path_for_role(role);
            self.navigate(landing);
        }
    }

    fn cmd_switch(&mut self, args: &[&str]) {
        let Some(role) = args.first().and_then(|s| Role::parse(s)) else {
            println!("usage: switch <citizen|responder>");
            return;
        };
        if self.store.switch_role(role) {
            println!("now acting as {}", role);
            self.navigate(self.table.default_path_for_role(role));
        } else {
            println!("no stored login for {}", role);
        }
    }

    fn cmd_clear(&mut self, args: &[&str]) {
        let Some(role) = args.first().and_then(|s| Role::parse(s)) else {
            println!("usage: clear <citizen|responder>");
            return;
        };
        self.store.clear_role_auth(role);
        println!("cleared stored login for {}", role);
        match self.store.snapshot().active_role() {
            Some(active) => self.navigate(self.table.default_path_for_role(active)),
            None => self.navigate(ROOT_PATH.to_string()),
        }
    }

    fn cmd_roles(&self) {
        let logged = self.store.logged_roles();
        if logged.is_empty() {
            println!("no stored logins");
            return;
        }
        let active = self.store.snapshot().active_role();
        for role in logged {
            let marker = if Some(role) == active { " (active)" } else { "" };
            println!("{}{}", role, marker);
        }
    }

    fn cmd_whoami(&self) {
        let session = self.store.snapshot();
        let Some(user) = session.user() else {
            println!("not logged in");
            return;
        };
        println!("{} <{}> role={} phone={}", user.name, user.username, user.role, user.phone);
        if let Some(dep) = &user.department {
            println!("department: {}", dep);
        }
        if let Some(token) = session.token() {
            println!("token: {}", token);
        }
    }

    fn cmd_routes(&self) {
        let Some(role) = self.store.snapshot().active_role() else {
            println!("not logged in");
            return;
        };
        let rows: Vec<[String; 2]> = self
            .table
            .routes_for_role(role)
            .into_iter()
            .map(|d| [d.path, d.meta.title])
            .collect();
        output::print_table(&["path", "title"], &rows);
    }

    /// Run a navigation attempt through the guard, re-entering it after each
    /// redirect exactly like the router would, until a route proceeds.
    fn navigate(&mut self, mut path: String) {
        for _ in 0..MAX_REDIRECTS {
            let Some(target) = self.table.find_route(&path) else {
                println!("no such route: {}", path);
                return;
            };
            match evaluate_navigation(&self.store.snapshot(), &target.meta, &target.path, &self.table) {
                RouteDecision::Proceed => {
                    self.current_path = target.path.clone();
                    println!("-> {} [{}]", target.path, target.meta.title);
                    return;
                }
                RouteDecision::RedirectTo(next) => {
                    println!("   {} redirects to {}", target.path, next);
                    path = next;
                }
            }
        }
        println!("redirect loop while resolving '{}'", path);
    }
}

fn print_help() {
    println!("commands:");
    println!("  login <username> <password> <citizen|responder>");
    println!("  logout                 end the active session");
    println!("  switch <role>          focus another stored login");
    println!("  clear <role>           drop a role's stored login");
    println!("  roles                  list stored logins");
    println!("  whoami                 show the active user");
    println!("  routes                 list routes for the active role");
    println!("  go <path>              navigate through the guard");
    println!("  exit");
}
