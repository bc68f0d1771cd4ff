mod check;
mod inspect;
mod tokens;
