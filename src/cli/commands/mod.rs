mod current;
mod init;
mod pick;
mod refresh;
mod serve;

pub use current::cmd_current;
pub use init::cmd_init;
pub use pick::cmd_pick;
pub use refresh::cmd_refresh;
pub use serve::cmd_serve;

use crate::models::IssueRecord;

const BODY_PREVIEW_CHARS: usize = 300;

fn print_issue(issue: &IssueRecord) {
    println!("{}", issue.title());
    println!("{:-<70}", "");

    if let Some(number) = issue.number() {
        println!("Number:  #{number}");
    }
    println!("State:   {}", issue.state());
    if let Some(login) = issue.author_login() {
        println!("Author:  {login}");
    }
    let labels = issue.label_names();
    if !labels.is_empty() {
        println!("Labels:  {}", labels.join(", "));
    }
    println!("URL:     {}", issue.html_url());

    let body = issue.body_text().trim();
    if !body.is_empty() {
        println!();
        if body.chars().count() > BODY_PREVIEW_CHARS {
            let preview: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
            println!("{preview}...");
        } else {
            println!("{body}");
        }
    }
}
