pub const APP_TITLE: &str = "Blogsmith: AI blog posts for HR topics";
pub const PROMPT: &str = "blogsmith> ";

pub const CMD_TOPICS: &str = "topics";
pub const CMD_TOPIC: &str = "topic";
pub const CMD_CUSTOM: &str = "custom";
pub const CMD_FORMAT: &str = "format";
pub const CMD_GENERATE: &str = "generate";
pub const CMD_EXPORT: &str = "export";
pub const CMD_SHOW: &str = "show";
pub const CMD_HELP: &str = "help";
pub const CMD_QUIT: &str = "quit";
pub const CMD_EXIT: &str = "exit";

pub const HELP_LINES: [&str; 9] = [
    "  topics                 list the trending topics",
    "  topic <n>              use trending topic number n",
    "  custom <text>          use your own topic",
    "  format <f>             output format: markdown, html, pdf or txt",
    "  generate               write a blog post about the current topic",
    "  export <f>             save the finished post in another format",
    "  show                   print the whole post",
    "  help                   show this list",
    "  quit                   leave",
];
