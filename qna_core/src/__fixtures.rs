use crate::generate_qna_pair;

/// Two sections with tab indented fences. The first has a bullet variant.
pub(crate) const CONTENT1: &str = "# ? who is the ceo?
- get me your ceo info?
\t```
\tSorry, I don't know.
\t```


# ? How do I programmatically update my KB?
\t```
\tYou can use our REST apis to manage your KB.
\t```
";

/// [`CONTENT1`] surrounded by empty pairs, with a directive at the top.
pub(crate) fn content2() -> String {
	let pair = generate_qna_pair("", "");

	format!("> !# @source.urls = https://download\n{pair}\n{CONTENT1}\n{pair}")
}

pub(crate) const WITH_DIAGNOSTICS: &str = "## Not a question
# ? q
stray text
```
a
```
```
b
```
";
