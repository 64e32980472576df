//! Integration tests running the cutarelease binary against temporary git repos

mod helpers;
mod test_release;
mod test_self_test;
