mod bootstrap;
mod login;
mod sessions;
