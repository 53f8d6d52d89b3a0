//! 终端命令解析

use crate::models::reports::ExportFormat;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Open(String),
    Login { username: String, password: String },
    Logout,
    Reload,
    New,
    Edit(i64),
    Set { field: String, value: String },
    Attach(String),
    Detach,
    Submit,
    Cancel,
    Delete(i64),
    Confirm,
    Detail(i64),
    Stats,
    Export(ExportFormat),
    Ask(String),
    Profile,
    ProfileUpdate(Vec<(String, String)>),
    Avatar(String),
    Passwd { old: String, new: String, confirm: String },
    Forgot(String),
    Seen,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  open <path>                 go to a screen (e.g. /classes, /tasks/3)
  login <username> <password> sign in
  logout                      sign out
  reload                      fetch the current list again
  new | edit <id>             open the form
  set <field> <value>         change a form field
  attach <file> | detach      add or remove the task attachment
  submit | cancel             save or discard the form
  delete <id> | confirm       delete a record (two steps)
  detail <id>                 show one task
  stats | export <xlsx|csv|pdf>
  ask <question>              ask the assistant
  profile [name=.. email=.. phone=..] | avatar <file>
  passwd <old> <new> <confirm> | forgot <email>
  seen                        mark notifications as read
  help | quit";

fn id_arg(command: &str, rest: &str) -> Result<i64, String> {
    rest.trim()
        .parse()
        .map_err(|_| format!("usage: {command} <id>"))
}

fn required(command: &str, rest: &str, usage: &str) -> Result<String, String> {
    let value = rest.trim();
    if value.is_empty() {
        Err(format!("usage: {command} {usage}"))
    } else {
        Ok(value.to_string())
    }
}

impl Command {
    /// 未登录时允许执行的命令之外都需要登录
    pub fn requires_login(&self) -> bool {
        !matches!(
            self,
            Command::Open(_)
                | Command::Login { .. }
                | Command::Forgot(_)
                | Command::Help
                | Command::Quit
        )
    }

    pub fn parse(line: &str) -> Result<Command, String> {
        let line = line.trim();
        let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match head.to_lowercase().as_str() {
            "open" | "go" => Command::Open(required(head, rest, "<path>")?),
            "login" => {
                let mut parts = rest.split_whitespace();
                match (parts.next(), parts.next()) {
                    (Some(username), Some(password)) => Command::Login {
                        username: username.to_string(),
                        password: password.to_string(),
                    },
                    _ => return Err("usage: login <username> <password>".to_string()),
                }
            }
            "logout" => Command::Logout,
            "reload" | "refresh" => Command::Reload,
            "new" | "create" => Command::New,
            "edit" => Command::Edit(id_arg(head, rest)?),
            "set" => {
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err("usage: set <field> <value>".to_string());
                }
                Command::Set {
                    field: field.to_string(),
                    value: value.trim().to_string(),
                }
            }
            "attach" => Command::Attach(required(head, rest, "<file>")?),
            "detach" => Command::Detach,
            "submit" | "save" => Command::Submit,
            "cancel" => Command::Cancel,
            "delete" | "rm" => Command::Delete(id_arg(head, rest)?),
            "confirm" | "yes" => Command::Confirm,
            "detail" | "show" => Command::Detail(id_arg(head, rest)?),
            "stats" => Command::Stats,
            "export" => Command::Export(rest.parse()?),
            "ask" => Command::Ask(required(head, rest, "<question>")?),
            "profile" if rest.is_empty() => Command::Profile,
            "profile" => {
                let mut fields = Vec::new();
                for pair in rest.split_whitespace() {
                    let Some((key, value)) = pair.split_once('=') else {
                        return Err("usage: profile [name=.. email=.. phone=..]".to_string());
                    };
                    fields.push((key.to_string(), value.to_string()));
                }
                Command::ProfileUpdate(fields)
            }
            "avatar" => Command::Avatar(required(head, rest, "<file>")?),
            "passwd" => {
                let parts: Vec<&str> = rest.split_whitespace().collect();
                match parts.as_slice() {
                    [old, new, confirm] => Command::Passwd {
                        old: old.to_string(),
                        new: new.to_string(),
                        confirm: confirm.to_string(),
                    },
                    _ => return Err("usage: passwd <old> <new> <confirm>".to_string()),
                }
            }
            "forgot" => Command::Forgot(required(head, rest, "<email>")?),
            "seen" => Command::Seen,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "" => return Err(String::new()),
            other => return Err(format!("Unknown command '{other}', type 'help'")),
        };
        Ok(command)
    }
}
