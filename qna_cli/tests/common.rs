use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub const FAQ: &str = "# ? who is the ceo?
- get me your ceo info?
```
Sorry, I don't know.
```

# ? How do I update my KB?
```
Use the REST api.
```
";

pub fn qna_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("qna"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("QNA_LOG");
	cmd
}
