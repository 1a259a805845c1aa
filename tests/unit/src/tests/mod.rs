mod failure;
mod teardown;
