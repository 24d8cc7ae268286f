//! User-facing replies.
//!
//! Replies to webhook updates are sent with the MarkdownV2 parse mode, so
//! every literal here is already escaped. Dynamic parts go through
//! [`telegram::escape_markdown`].

use telegram::escape_markdown;

pub const DAILY_LOCATION_QUESTION: &str =
    "What location do you want me to check this week\\'s weather for?";

pub const HOURLY_LOCATION_QUESTION: &str =
    "What location do you want me to check today\\'s weather for?";

pub const HOME_QUESTION: &str = "What location do you want to save as your home?";

pub const UNKNOWN_TEXT: &str = "I\\'m not sure what you mean with that\\. Try hitting me up with \
     the /hourly or /daily commands if you need me to check the weather for you ☔️";

pub const UNABLE_TO_GET_REPORT: &str = "I\\'m sorry, the network isn\\'t doing it\\'s best job \
     and I can\\'t get your report just now\\. Please try again in a bit\\.";

pub const UNSUPPORTED_INTERACTION: &str = "Unsupported type of interaction";

pub const UNEXPECTED_ERROR: &str =
    "Whops\\! Something\\'s not working like it should\\. Try again in a bit\\.";

pub const NOT_AUTHORISED: &str = "You\\'re not authorised to talk to me, sorry\\!";

pub const EMPTY_FORECAST: &str =
    r"hey, not sure why but I couldn\'t get any forecasts ¯\\\_\(ツ\)\_/¯";

/// Greeting for `/start` and `/help`.
pub fn help(first_name: &str) -> String {
    format!(
        "👋 Hi {}\\! My name is weathry, great to meet you\\!\n\n\
         I\\'ve been programmed to pretty much help you with any of your weather needs\\. \
         These are some of the things I can do\\:\n\n\
         1\\. /hourly, Check the hourly forecast for you\\.\n\
         2\\. /daily, Check the whole week\\'s forecast for you\\.\n\
         3\\. /home, Keep track of your home so I can send you timely reminders of when \
         there\\'s going to be a weather change\\.\n\n\
         With regards to the reminders I can send, I just track low and high temperatures \
         and rain\\. This means that if the temperature drops or increases too much in an \
         upcoming day, or it\\'s simply going to rain, then I\\'ll let you know\\.",
        escape_markdown(first_name)
    )
}

/// Prompt for `/home` when a home is already saved.
pub fn current_home(name: &str) -> String {
    format!(
        "Your current home is {}\\. {}",
        escape_markdown(name),
        HOME_QUESTION
    )
}

/// Confirmation after a successful Set-Home.
pub fn home_set(name: &str) -> String {
    format!(
        "Successfully set {} as your home\\! I\\'ll now watch it for any weather changes \
         and let you know 🙂",
        escape_markdown(name)
    )
}
