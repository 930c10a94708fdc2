mod expect;
mod finish;
mod play;
mod rule;
mod send_input;
mod show;
mod wait;

pub use expect::Expect;
pub use finish::Finish;
pub use play::Play;
pub use rule::AddRule;
pub use send_input::SendInput;
pub use show::Show;
pub use wait::Wait;
