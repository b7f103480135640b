mod test_message_reaches_only_partner;
