pub mod member_join;
