mod bid;
mod tender;

pub use self::{
    bid::*,
    tender::*,
};
