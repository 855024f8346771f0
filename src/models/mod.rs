mod article;
mod contact;
mod evidence;
mod operator;
mod site;
mod submission;
mod tag;

pub use article::*;
pub use contact::*;
pub use evidence::*;
pub use operator::*;
pub use site::*;
pub use submission::*;
pub use tag::*;
