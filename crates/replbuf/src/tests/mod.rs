mod append_bad;
