pub mod cond_server;
