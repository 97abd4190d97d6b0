mod integration;
mod persistence;
